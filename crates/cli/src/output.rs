//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use sizer_lib::CapacityTier;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print a list of rows as a table, or the raw items as JSON
pub fn print_list<T: Serialize, R: Tabled>(
    items: &[T],
    rows: impl FnOnce(&[T]) -> Vec<R>,
    empty_message: &str,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(&items)?,
        OutputFormat::Table => {
            if items.is_empty() {
                print_warning(empty_message);
                return Ok(());
            }
            println!("{}", render_table(rows(items)));
        }
    }
    Ok(())
}

/// Render rows with the shared table style
pub fn render_table<R: Tabled>(rows: Vec<R>) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Pretty-print any serializable value as JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a section heading with an underline
pub fn print_heading(title: &str, underline: char) {
    println!("{}", title.bold());
    println!("{}", underline.to_string().repeat(50));
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Format a quantity, dropping the fraction when it is whole
pub fn format_quantity(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// Format GiB, switching to TiB for large values
pub fn format_gib(gib: f64) -> String {
    if gib >= 1024.0 {
        format!("{:.2} TiB", gib / 1024.0)
    } else {
        format!("{} GiB", format_quantity(gib))
    }
}

/// Format a growth percentage
pub fn format_rate(rate: f64) -> String {
    format!("{}%", format_quantity(rate))
}

/// Color a usage percentage by its capacity tier
pub fn color_usage(usage: u8) -> String {
    let formatted = format!("{}%", usage);
    match CapacityTier::from_usage(usage) {
        CapacityTier::Good => formatted.green().to_string(),
        CapacityTier::Warning => formatted.yellow().to_string(),
        CapacityTier::OverCapacity => formatted.red().to_string(),
    }
}

/// Color a tier label
pub fn color_tier(tier: CapacityTier) -> String {
    let label = tier.label();
    match tier {
        CapacityTier::Good => label.green().to_string(),
        CapacityTier::Warning => label.yellow().to_string(),
        CapacityTier::OverCapacity => label.red().bold().to_string(),
    }
}
