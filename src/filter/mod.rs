pub mod column;
pub mod error;
pub mod panel;
pub mod range;

pub use column::{ColumnKind, ColumnSpec, SelectOption};
pub use error::FilterError;
pub use panel::{ColumnFilterPanel, FilterChange, FilterChip, FilterMap, FilterSnapshot, InitialValues};
pub use range::{encode_range, extract_max_value, extract_min_value};
