use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::column::{ColumnKind, ColumnSpec, SelectOption};
use super::error::FilterError;
use super::range::{decode_range, encode_range};

/// Page sizes offered by the "show entries" selector
pub const SHOW_ENTRIES_OPTIONS: [u32; 10] = [10, 25, 50, 100, 250, 500, 1000, 2500, 5000, 10000];
pub const DEFAULT_SHOW_ENTRIES: u32 = 25;

/// Column key -> filter expression. A key is only present with a non-empty value.
pub type FilterMap = BTreeMap<String, String>;

/// Returned whenever the applied filters may have changed; the owner re-reads
/// [`ColumnFilterPanel::get_filters`] and reloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "the owner should reload when filters change"]
pub struct FilterChange;

/// Pending (typed, not yet applied) value of one column input
#[derive(Debug, Clone, PartialEq)]
enum FilterInput {
    Value(String),
    Range { min: String, max: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterChip {
    pub key: String,
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterParameters {
    pub limit: u32,
    pub filters: FilterMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSnapshot {
    pub filters: FilterMap,
    pub show_entries: u32,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InitialValues {
    pub limit: Option<u32>,
    pub filters: Option<FilterMap>,
}

/// Per-column filter inputs aggregated into a [`FilterMap`]
#[derive(Debug, Clone)]
pub struct ColumnFilterPanel {
    columns: Vec<ColumnSpec>,
    inputs: HashMap<String, FilterInput>,
    filters: FilterMap,
    show_entries: u32,
    max_entries: u32,
    visible: bool,
}

impl ColumnFilterPanel {
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self {
            columns,
            inputs: HashMap::new(),
            filters: FilterMap::new(),
            show_entries: DEFAULT_SHOW_ENTRIES,
            max_entries: 10_000,
            visible: false,
        }
    }

    pub fn with_max_entries(mut self, max_entries: u32) -> Self {
        self.max_entries = max_entries;
        self
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Upper bound on rows per request. Advertised only; the server enforces it.
    pub fn max_entries(&self) -> u32 {
        self.max_entries
    }

    /// Replace the options of a select column (e.g. once analysis types load)
    pub fn set_options(&mut self, key: &str, options: Vec<SelectOption>) -> Result<(), FilterError> {
        let column = self.column_mut(key)?;
        match &mut column.kind {
            ColumnKind::Select { options: current } => {
                *current = options;
                Ok(())
            }
            other => Err(FilterError::WrongInputKind { column: key.to_string(), expected: other.name() }),
        }
    }

    /// Type into a text or select column. Not applied until [`apply_filters`](Self::apply_filters).
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), FilterError> {
        let column = self.column(key)?;
        match &column.kind {
            ColumnKind::Text => {}
            ColumnKind::Select { options } => {
                let value = value.trim();
                if !value.is_empty() && !options.is_empty() && !options.iter().any(|o| o.value == value) {
                    return Err(FilterError::OptionNotOffered { column: key.to_string(), value: value.to_string() });
                }
            }
            ColumnKind::Number => {
                return Err(FilterError::WrongInputKind { column: key.to_string(), expected: "number" });
            }
        }
        self.inputs.insert(key.to_string(), FilterInput::Value(value.to_string()));
        Ok(())
    }

    /// Fill the min/max inputs of a numeric column
    pub fn set_range(&mut self, key: &str, min: &str, max: &str) -> Result<(), FilterError> {
        let column = self.column(key)?;
        if column.kind != ColumnKind::Number {
            return Err(FilterError::WrongInputKind { column: key.to_string(), expected: column.kind.name() });
        }
        for bound in [min.trim(), max.trim()] {
            if !bound.is_empty() && !bound.parse::<f64>().is_ok_and(f64::is_finite) {
                return Err(FilterError::InvalidNumber { column: key.to_string(), value: bound.to_string() });
            }
        }
        self.inputs.insert(key.to_string(), FilterInput::Range { min: min.to_string(), max: max.to_string() });
        Ok(())
    }

    /// Rebuild the filter map from every column input
    pub fn apply_filters(&mut self) -> FilterChange {
        let mut filters = FilterMap::new();
        for column in &self.columns {
            let value = match self.inputs.get(&column.key) {
                Some(FilterInput::Value(v)) => Some(v.trim().to_string()).filter(|v| !v.is_empty()),
                Some(FilterInput::Range { min, max }) => encode_range(min, max),
                None => None,
            };
            if let Some(value) = value {
                filters.insert(column.key.clone(), value);
            }
        }

        tracing::debug!("applied {} column filter(s)", filters.len());
        self.filters = filters;
        FilterChange
    }

    pub fn clear_filter(&mut self, key: &str) -> FilterChange {
        self.inputs.remove(key);
        self.filters.remove(key);
        self.apply_filters()
    }

    pub fn clear_all_filters(&mut self) -> FilterChange {
        self.inputs.clear();
        self.filters.clear();
        self.apply_filters()
    }

    pub fn get_filters(&self) -> FilterMap {
        self.filters.clone()
    }

    /// `label: value` chips for the active filters, in column order
    pub fn active_chips(&self) -> Vec<FilterChip> {
        self.columns
            .iter()
            .filter_map(|c| {
                self.filters.get(&c.key).map(|value| FilterChip {
                    key: c.key.clone(),
                    label: c.label.clone(),
                    value: value.clone(),
                })
            })
            .collect()
    }

    pub fn show_entries(&self) -> u32 {
        self.show_entries
    }

    pub fn set_show_entries(&mut self, entries: u32) -> Result<FilterChange, FilterError> {
        if !SHOW_ENTRIES_OPTIONS.contains(&entries) {
            return Err(FilterError::InvalidShowEntries(entries));
        }
        self.show_entries = entries;
        Ok(FilterChange)
    }

    pub fn get_all_parameters(&self) -> FilterParameters {
        FilterParameters { limit: self.show_entries, filters: self.get_filters() }
    }

    pub fn export_filters(&self) -> FilterSnapshot {
        FilterSnapshot { filters: self.get_filters(), show_entries: self.show_entries, timestamp: Utc::now() }
    }

    /// Restore a snapshot into the inputs and apply it. Keys for unknown
    /// columns are skipped.
    pub fn import_filters(&mut self, snapshot: &FilterSnapshot) -> FilterChange {
        self.load_inputs(&snapshot.filters);
        if SHOW_ENTRIES_OPTIONS.contains(&snapshot.show_entries) {
            self.show_entries = snapshot.show_entries;
        }
        self.apply_filters()
    }

    /// Prefill inputs (and page size) without applying them
    pub fn set_initial_values(&mut self, values: &InitialValues) {
        if let Some(limit) = values.limit.filter(|l| SHOW_ENTRIES_OPTIONS.contains(l)) {
            self.show_entries = limit;
        }
        if let Some(filters) = &values.filters {
            self.load_inputs(filters);
        }
    }

    pub fn toggle_visibility(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    fn load_inputs(&mut self, filters: &FilterMap) {
        self.inputs.clear();
        for (key, value) in filters {
            let Some(column) = self.columns.iter().find(|c| &c.key == key) else {
                tracing::warn!("skipping filter for unknown column {}", key);
                continue;
            };
            let input = match column.kind {
                ColumnKind::Number => {
                    let (min, max) = decode_range(value);
                    FilterInput::Range { min, max }
                }
                _ => FilterInput::Value(value.clone()),
            };
            self.inputs.insert(key.clone(), input);
        }
    }

    fn column(&self, key: &str) -> Result<&ColumnSpec, FilterError> {
        self.columns
            .iter()
            .find(|c| c.key == key)
            .ok_or_else(|| FilterError::UnknownColumn(key.to_string()))
    }

    fn column_mut(&mut self, key: &str) -> Result<&mut ColumnSpec, FilterError> {
        self.columns
            .iter_mut()
            .find(|c| c.key == key)
            .ok_or_else(|| FilterError::UnknownColumn(key.to_string()))
    }
}
