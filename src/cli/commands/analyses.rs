use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Subcommand};
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::analyses::{
    export_file_name, AdditionalAnalysisRequest, AnalysesApi, ExportRequest, TEMPLATE_FILE_NAME,
};
use crate::cli::config::{api_client, open_session};
use crate::cli::utils::{output_error, output_list, output_success, render_table};
use crate::cli::OutputFormat;
use crate::config::PanelConfig;
use crate::controller::{analysis_columns, Notice, ResourceListController};
use crate::filter::ColumnFilterPanel;
use crate::pagination::{CursorPaginator, CursorStrategy, Mode, OffsetPaginator, PaginatorOptions};

/// Screen path the list commands stand for
pub const SCREEN_PATH: &str = "/additional-analyses";

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    #[arg(long, help = "Filter by account code")]
    pub account_code: Option<String>,
    #[arg(long, help = "Filter by analysis type")]
    pub analysis_type: Option<String>,
    #[arg(long, help = "Filter by status (active, inactive)")]
    pub status: Option<String>,
    #[arg(long, help = "Free-text search")]
    pub search: Option<String>,
}

#[derive(Subcommand)]
pub enum AnalysesCommands {
    #[command(about = "List one page of additional analyses")]
    List {
        #[arg(long, default_value_t = 1, help = "Page number")]
        page: u32,
        #[arg(long, help = "Rows per page")]
        limit: Option<u32>,
        #[command(flatten)]
        filters: FilterArgs,
    },

    #[command(about = "Interactive list: page, search and filter from stdin")]
    Browse {
        #[arg(long, default_value = "cursor", help = "Pagination mode (cursor or offset)")]
        mode: Mode,
    },

    #[command(about = "Show one additional analysis")]
    Get {
        #[arg(help = "Analysis ID")]
        id: i64,
    },

    #[command(about = "Create an additional analysis")]
    Create {
        #[arg(help = "Account code")]
        account_code: String,
        #[arg(help = "Analysis type")]
        analysis_type: String,
        #[arg(help = "Analysis title")]
        title: String,
        #[arg(long, default_value = "active")]
        status: String,
        #[arg(long, default_value = "")]
        notes: String,
    },

    #[command(about = "Update fields of an additional analysis")]
    Update {
        #[arg(help = "Analysis ID")]
        id: i64,
        #[arg(long)]
        account_code: Option<String>,
        #[arg(long)]
        analysis_type: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },

    #[command(about = "Delete an additional analysis")]
    Delete {
        #[arg(help = "Analysis ID")]
        id: i64,
        #[arg(long, short, help = "Skip the confirmation prompt")]
        yes: bool,
        #[arg(long, help = "Remove permanently instead of deactivating")]
        hard: bool,
    },

    #[command(about = "Show every analysis attached to an account")]
    ByAccount {
        #[arg(help = "Account code")]
        account_code: String,
    },

    #[command(about = "Import analyses from an Excel file")]
    Import {
        #[arg(help = "Path to .xlsx/.xls file")]
        file: PathBuf,
    },

    #[command(about = "Export matching analyses to Excel")]
    Export {
        #[arg(long, default_value = ".", help = "Directory to write the file into")]
        output: PathBuf,
        #[arg(long, value_delimiter = ',', help = "Columns to include (comma separated)")]
        columns: Vec<String>,
        #[command(flatten)]
        filters: FilterArgs,
    },

    #[command(about = "Download the CSV import template")]
    Template {
        #[arg(long, default_value = TEMPLATE_FILE_NAME, help = "Where to save the template")]
        output: PathBuf,
    },

    #[command(about = "List known analysis types")]
    Types,
}

fn open_api(config: &PanelConfig) -> anyhow::Result<AnalysesApi> {
    let session = open_session(config, SCREEN_PATH)?;
    session.ensure_access()?;
    Ok(AnalysesApi::new(api_client(config, session)?))
}

fn confirm(question: &str) -> anyhow::Result<bool> {
    eprint!("{} [y/N] ", question);
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}

pub async fn handle(cmd: AnalysesCommands, config: &PanelConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let api = open_api(config)?;
    let options = PaginatorOptions::from_config(&config.listing);
    let panel = || ColumnFilterPanel::new(analysis_columns()).with_max_entries(config.listing.max_entries);

    match cmd {
        AnalysesCommands::List { page, limit, filters } => {
            let mut controller = ResourceListController::new(api, OffsetPaginator::new(options), panel());
            if let Some(limit) = limit {
                if controller.paginator_mut().change_limit(limit).is_none() {
                    anyhow::bail!("limit must be between 1 and {}", config.listing.max_entries);
                }
            }
            apply_filter_args(&mut controller, &filters)?;
            let _ = controller.paginator_mut().go_to_page(page);

            controller.refresh().await;
            if let Some(Notice::Error(text)) = controller.notice() {
                anyhow::bail!("{}", text);
            }
            output_list(&output_format, &controller)
        }
        AnalysesCommands::Browse { mode } => {
            let paginator = CursorPaginator::with_mode(options, mode);
            let mut controller = ResourceListController::new(api, paginator, panel());
            browse(&mut controller, &output_format).await
        }
        AnalysesCommands::Get { id } => {
            let row = api.get(id).await.with_context(|| format!("failed to load analysis {}", id))?;
            match output_format {
                OutputFormat::Json => output_success(&output_format, "Additional analysis", Some(json!({ "data": row }))),
                OutputFormat::Text => {
                    println!("{}", render_table(std::slice::from_ref(&row)));
                    if let Some(notes) = row.notes.as_deref().filter(|n| !n.is_empty()) {
                        println!("\nNotes: {}", notes);
                    }
                    Ok(())
                }
            }
        }
        AnalysesCommands::Create { account_code, analysis_type, title, status, notes } => {
            let request = AdditionalAnalysisRequest { account_code, analysis_type, analysis_title: title, status, notes };
            let reply = api.create(request).await.context("failed to create additional analysis")?;
            let message = reply.message.unwrap_or_else(|| "Additional analysis created successfully".to_string());
            output_success(&output_format, &message, Some(json!({ "data": reply.data })))
        }
        AnalysesCommands::Update { id, account_code, analysis_type, title, status, notes } => {
            let current = api.get(id).await.with_context(|| format!("failed to load analysis {}", id))?;
            let mut request = AdditionalAnalysisRequest::from(&current);
            if let Some(v) = account_code {
                request.account_code = v;
            }
            if let Some(v) = analysis_type {
                request.analysis_type = v;
            }
            if let Some(v) = title {
                request.analysis_title = v;
            }
            if let Some(v) = status {
                request.status = v;
            }
            if let Some(v) = notes {
                request.notes = v;
            }

            let reply = api.update(id, request).await.context("failed to update additional analysis")?;
            let message = reply.message.unwrap_or_else(|| "Additional analysis updated successfully".to_string());
            output_success(&output_format, &message, Some(json!({ "data": reply.data })))
        }
        AnalysesCommands::Delete { id, yes, hard } => {
            let question = if hard {
                format!("Permanently delete additional analysis {}?", id)
            } else {
                format!("Delete additional analysis {}?", id)
            };
            if !yes && !confirm(&question)? {
                return output_success(&output_format, "Deletion cancelled", None);
            }
            let reply = if hard {
                api.hard_delete(id).await.context("failed to hard delete additional analysis")?
            } else {
                api.delete(id).await.context("failed to delete additional analysis")?
            };
            let message = reply.message.unwrap_or_else(|| "Additional analysis deleted successfully".to_string());
            output_success(&output_format, &message, Some(json!({ "id": id, "hard": hard })))
        }
        AnalysesCommands::ByAccount { account_code } => {
            let rows = api
                .by_account(&account_code)
                .await
                .with_context(|| format!("failed to load analyses for account {}", account_code))?;
            match output_format {
                OutputFormat::Json => output_success(&output_format, "Additional analyses", Some(json!({ "data": rows }))),
                OutputFormat::Text => {
                    if rows.is_empty() {
                        println!("No additional analyses for account {}", account_code.trim());
                    } else {
                        println!("{}", render_table(&rows));
                    }
                    Ok(())
                }
            }
        }
        AnalysesCommands::Import { file } => {
            let reply = api.import_file(&file).await.context("failed to import additional analyses")?;
            let result = reply.data;
            if let OutputFormat::Text = output_format {
                for error in result.errors.iter().flatten() {
                    eprintln!("row {}: {} ({}={:?})", error.row, error.message, error.field, error.value);
                }
            }
            output_success(&output_format, &result.summary(), Some(json!({ "data": result })))
        }
        AnalysesCommands::Export { output, columns, filters } => {
            let request = ExportRequest {
                account_code: non_empty(filters.account_code),
                analysis_type: non_empty(filters.analysis_type),
                status: non_empty(filters.status),
                search: non_empty(filters.search),
                columns: columns.into_iter().map(|c| c.trim().to_string()).filter(|c| !c.is_empty()).collect(),
                ..ExportRequest::default()
            };
            let bytes = api.export(&request).await.context("failed to export additional analyses")?;
            let path = output.join(export_file_name(chrono::Local::now().date_naive()));
            tokio::fs::write(&path, &bytes)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!("exported {} bytes to {}", bytes.len(), path.display());
            output_success(
                &output_format,
                &format!("Exported to {}", path.display()),
                Some(json!({ "path": path, "bytes": bytes.len() })),
            )
        }
        AnalysesCommands::Template { output } => {
            let bytes = api.template().await.context("failed to download template")?;
            tokio::fs::write(&output, &bytes)
                .await
                .with_context(|| format!("failed to write {}", output.display()))?;
            output_success(
                &output_format,
                &format!("Template saved to {}", output.display()),
                Some(json!({ "path": output })),
            )
        }
        AnalysesCommands::Types => {
            let types = api.types().await.context("failed to load analysis types")?;
            match output_format {
                OutputFormat::Json => output_success(&output_format, "Analysis types", Some(json!({ "data": types }))),
                OutputFormat::Text => {
                    for t in &types {
                        println!("{}", t);
                    }
                    Ok(())
                }
            }
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn apply_filter_args<S: crate::pagination::NavigationStrategy>(
    controller: &mut ResourceListController<S>,
    args: &FilterArgs,
) -> anyhow::Result<()> {
    let filters = controller.filters_mut();
    for (key, value) in [
        ("account_code", &args.account_code),
        ("analysis_type", &args.analysis_type),
        ("status", &args.status),
    ] {
        if let Some(value) = value {
            filters.set_value(key, value)?;
        }
    }
    let _ = controller.apply_filters();
    if let Some(search) = &args.search {
        let _ = controller.paginator_mut().search(search);
    }
    Ok(())
}

/// One line of input in the interactive browser
#[derive(Debug, Clone, PartialEq)]
pub enum BrowseCommand {
    Next,
    Previous,
    Page(u32),
    Limit(u32),
    Search(String),
    ClearSearch,
    Filter { key: String, value: String },
    Range { key: String, min: String, max: String },
    ClearFilter(String),
    ClearFilters,
    Mode(Mode),
    ToggleFilters,
    Reload,
    Help,
    Quit,
}

pub const BROWSE_HELP: &str = "\
n / p            next / previous page
g N              go to page N (offset mode)
l N              rows per page
s TERM | c       search / clear search
f KEY=VALUE      set a column filter
r KEY=MIN:MAX    set a numeric range filter
x KEY | X        clear one / all filters
v                show filter columns
m cursor|offset  switch pagination mode
<enter>          reload, q to quit";

impl std::str::FromStr for BrowseCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };
        let number = |what: &str| rest.parse::<u32>().map_err(|_| format!("{} needs a number, got {:?}", what, rest));
        let pair = |sep: char| {
            rest.split_once(sep)
                .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
                .ok_or_else(|| format!("expected KEY{}VALUE, got {:?}", sep, rest))
        };

        match head {
            "" => Ok(BrowseCommand::Reload),
            "n" | "next" => Ok(BrowseCommand::Next),
            "p" | "prev" => Ok(BrowseCommand::Previous),
            "g" | "page" => Ok(BrowseCommand::Page(number("g")?)),
            "l" | "limit" => Ok(BrowseCommand::Limit(number("l")?)),
            "s" | "search" if !rest.is_empty() => Ok(BrowseCommand::Search(rest.to_string())),
            "s" | "search" | "c" => Ok(BrowseCommand::ClearSearch),
            "f" => {
                let (key, value) = pair('=')?;
                Ok(BrowseCommand::Filter { key, value })
            }
            "r" => {
                let (key, bounds) = pair('=')?;
                let (min, max) = bounds.split_once(':').unwrap_or((bounds.as_str(), ""));
                Ok(BrowseCommand::Range { key, min: min.to_string(), max: max.to_string() })
            }
            "x" if !rest.is_empty() => Ok(BrowseCommand::ClearFilter(rest.to_string())),
            "x" | "X" => Ok(BrowseCommand::ClearFilters),
            "m" | "mode" => Ok(BrowseCommand::Mode(rest.parse()?)),
            "v" => Ok(BrowseCommand::ToggleFilters),
            "?" | "h" | "help" => Ok(BrowseCommand::Help),
            "q" | "quit" | "exit" => Ok(BrowseCommand::Quit),
            other => Err(format!("unknown command {:?} (? for help)", other)),
        }
    }
}

async fn browse(
    controller: &mut ResourceListController<CursorStrategy>,
    output_format: &OutputFormat,
) -> anyhow::Result<()> {
    controller.load_types().await;
    controller.refresh().await;
    output_list(output_format, controller)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        eprint!("> ");
        io::stderr().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match line.parse::<BrowseCommand>() {
            Ok(command) => command,
            Err(message) => {
                output_error(output_format, &message, Some("INVALID_INPUT"))?;
                continue;
            }
        };

        let event = match command {
            BrowseCommand::Quit => break,
            BrowseCommand::Help => {
                println!("{}", BROWSE_HELP);
                continue;
            }
            BrowseCommand::ToggleFilters => {
                if controller.filters_mut().toggle_visibility() {
                    for column in controller.filters().columns() {
                        println!("  {:<14} {:<14} {}", column.key, column.kind.name(), column.label);
                    }
                }
                continue;
            }
            BrowseCommand::Reload => {
                controller.refresh().await;
                output_list(output_format, controller)?;
                continue;
            }
            BrowseCommand::Next => controller.paginator_mut().go_next(),
            BrowseCommand::Previous => controller.paginator_mut().go_previous(),
            BrowseCommand::Page(page) => controller.paginator_mut().go_to_page(page),
            BrowseCommand::Limit(limit) => controller.paginator_mut().change_limit(limit),
            BrowseCommand::Search(term) => controller.paginator_mut().search(&term),
            BrowseCommand::ClearSearch => controller.paginator_mut().clear_search(),
            BrowseCommand::Mode(mode) => controller.change_mode(mode),
            BrowseCommand::ClearFilter(key) => Some(controller.clear_filter(&key)),
            BrowseCommand::ClearFilters => Some(controller.clear_all_filters()),
            BrowseCommand::Filter { key, value } => {
                let result = controller.filters_mut().set_value(&key, &value);
                match result {
                    Ok(()) => Some(controller.apply_filters()),
                    Err(e) => {
                        output_error(output_format, &e.to_string(), Some("INVALID_INPUT"))?;
                        continue;
                    }
                }
            }
            BrowseCommand::Range { key, min, max } => {
                let result = controller.filters_mut().set_range(&key, &min, &max);
                match result {
                    Ok(()) => Some(controller.apply_filters()),
                    Err(e) => {
                        output_error(output_format, &e.to_string(), Some("INVALID_INPUT"))?;
                        continue;
                    }
                }
            }
        };

        if event.is_none() {
            eprintln!("(nothing to do)");
            continue;
        }
        controller.handle(event).await;
        output_list(output_format, controller)?;
    }
    Ok(())
}
