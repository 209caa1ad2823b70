//! Rendering for `--output`.
//!
//! Lists become `tabled` tables, single records become aligned
//! `label  value` blocks. `json`, `json-compact` and `yaml` serialize the
//! records themselves; `plain` prints one identifying value per line so
//! results can be piped into other commands.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};

/// `--color auto` colors only an interactive stdout with `NO_COLOR` unset.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

/// Render a collection.
///
/// `to_row` builds the table row for an item and `plain_line` its line in
/// `plain` mode. Structured formats ignore both.
pub fn render_list<T, R>(
    format: &OutputFormat,
    items: &[T],
    to_row: impl Fn(&T) -> R,
    plain_line: impl Fn(&T) -> String,
) -> String
where
    T: Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = items.iter().map(to_row).collect();
            Table::new(rows).with(Style::rounded()).to_string()
        }
        OutputFormat::Plain => items.iter().map(plain_line).collect::<Vec<_>>().join("\n"),
        structured => serialize(structured, items),
    }
}

/// Render one record; `detail` produces the table-mode view.
pub fn render_single<T>(
    format: &OutputFormat,
    item: &T,
    detail: impl Fn(&T) -> String,
    plain_line: impl Fn(&T) -> String,
) -> String
where
    T: Serialize + ?Sized,
{
    match format {
        OutputFormat::Table => detail(item),
        OutputFormat::Plain => plain_line(item),
        structured => serialize(structured, item),
    }
}

fn serialize<T: Serialize + ?Sized>(format: &OutputFormat, item: &T) -> String {
    match format {
        OutputFormat::JsonCompact => {
            serde_json::to_string(item).expect("CLI records serialize to JSON")
        }
        OutputFormat::Yaml => serde_yaml::to_string(item).expect("CLI records serialize to YAML"),
        _ => serde_json::to_string_pretty(item).expect("CLI records serialize to JSON"),
    }
}

/// Label/value pairs, values aligned after the longest label.
pub fn render_fields(fields: &[(&str, String)], color: bool) -> String {
    let width = fields.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let lines: Vec<String> = fields
        .iter()
        .map(|(label, value)| {
            let label = format!("{label:<width$}");
            if color {
                format!("{}  {value}", label.bold())
            } else {
                format!("{label}  {value}")
            }
        })
        .collect();
    lines.join("\n")
}

/// `-` stands in for values the card did not report.
pub fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".into(), |v| v.to_string())
}

/// Write a rendered result to stdout. Nothing is printed with `--quiet`.
pub fn print_output(rendered: &str, quiet: bool) {
    if quiet || rendered.is_empty() {
        return;
    }
    let _ = writeln!(io::stdout().lock(), "{rendered}");
}

/// Confirm an applied change on stderr so stdout stays scriptable.
pub fn print_done(global: &GlobalOpts, message: &str) {
    if global.quiet {
        return;
    }
    let mark = if should_color(&global.color) {
        "✓".green().to_string()
    } else {
        "✓".to_owned()
    };
    eprintln!("{mark} {message}");
}
