use serde_json::{json, Value};

use crate::analyses::AdditionalAnalysis;
use crate::cli::OutputFormat;
use crate::controller::{Notice, ResourceListController};
use crate::pagination::NavigationStrategy;

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            match data {
                Some(Value::Object(fields)) => {
                    if let Some(object) = response.as_object_mut() {
                        object.extend(fields);
                    }
                }
                Some(other) => response["data"] = other,
                None => {}
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: &OutputFormat, message: &str, error_code: Option<&str>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

fn table_line(values: &[&str], widths: &[usize]) -> String {
    values
        .iter()
        .zip(widths)
        .map(|(v, w)| format!("{:<w$}", truncate(v, *w), w = *w))
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end()
        .to_string()
}

/// Fixed-width table of analyses
pub fn render_table(rows: &[AdditionalAnalysis]) -> String {
    const HEADERS: [&str; 6] = ["ID", "Account", "Type", "Title", "Status", "Updated"];
    const WIDTHS: [usize; 6] = [6, 28, 22, 32, 8, 16];

    let cells: Vec<[String; 6]> = rows
        .iter()
        .map(|r| {
            let account = match r.account_name.as_deref().filter(|n| !n.is_empty()) {
                Some(name) => format!("{} {}", r.account_code, name),
                None => r.account_code.clone(),
            };
            [
                r.id.to_string(),
                account,
                r.analysis_type.clone(),
                r.analysis_title.clone(),
                r.status.clone(),
                r.updated_at.format("%Y-%m-%d %H:%M").to_string(),
            ]
        })
        .collect();

    let mut out = vec![table_line(&HEADERS, &WIDTHS)];
    out.push(WIDTHS.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join(" "));
    if cells.is_empty() {
        out.push("No additional analyses found".to_string());
    }
    for row in &cells {
        let values: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push(table_line(&values, &WIDTHS));
    }
    out.join("\n")
}

/// Print the current list screen: notice, filter chips, table, pagination bar
pub fn output_list<S: NavigationStrategy>(
    output_format: &OutputFormat,
    controller: &ResourceListController<S>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let response = json!({
                "success": !matches!(controller.notice(), Some(Notice::Error(_))),
                "data": controller.rows(),
                "pagination": controller.paginator().metadata(),
                "filters": controller.filters().get_filters(),
                "statistics": controller.statistics(),
                "notice": controller.notice().map(Notice::text),
            });
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            match controller.notice() {
                Some(Notice::Error(text)) => eprintln!("Error: {}", text),
                Some(Notice::Info(text)) => println!("✓ {}", text),
                None => {}
            }
            let chips = controller.filters().active_chips();
            if !chips.is_empty() {
                let chips: Vec<String> = chips.iter().map(|c| format!("[{}: {}]", c.label, c.value)).collect();
                println!("Filters: {}", chips.join(" "));
            }
            println!("{}", render_table(controller.rows()));
            println!("{}", controller.paginator().view());
            let stats = controller.statistics();
            println!(
                "{} on page, {} active, {} analysis types",
                stats.rows_on_page, stats.active_on_page, stats.known_types
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_truncates_long_cells() {
        let row: AdditionalAnalysis = serde_json::from_value(json!({
            "id": 3, "account_code": "12060700", "analysis_type": "revenue_recognition",
            "analysis_title": "A title that is much longer than the column allows for display",
            "status": "active", "created_at": "2024-03-01T08:00:00Z", "updated_at": "2024-03-01T08:00:00Z"
        }))
        .unwrap();

        let table = render_table(&[row]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[2].contains("A title that is much longer t..."));
        assert!(lines[2].contains("2024-03-01 08:00"));
    }

    #[test]
    fn empty_table_says_so() {
        assert!(render_table(&[]).ends_with("No additional analyses found"));
    }
}
