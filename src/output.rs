//! Report rendering and table export.
//!
//! Supports an HTML document renderer, CSV export of the display table, and
//! JSON logging of an aggregation result.

use anyhow::{Context, Result};
use chrono::Utc;
use csv::WriterBuilder;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::narrative::HTML_LINE_BREAK;
use crate::table::DisplayRow;

/// Produces a named document artifact from a title, summary and table.
pub trait DocumentRenderer {
    /// `summary` is the already-delimited narrative block; `table` includes its header row.
    fn render(&self, title: &str, summary: &str, table: &[DisplayRow]) -> Result<PathBuf>;
}

/// Writes a self-contained HTML document to `path`.
pub struct HtmlReport {
    path: PathBuf,
}

impl HtmlReport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Builds the document markup without touching the filesystem.
    ///
    /// The summary is split on `<br/>` and each line escaped separately, so
    /// the line breaks survive while everything else is treated as text.
    pub fn to_html(title: &str, summary: &str, table: &[DisplayRow]) -> String {
        let mut html = String::new();
        let title = escape_html(title);

        // Writing into a String cannot fail.
        let _ = writeln!(html, "<!DOCTYPE html>");
        let _ = writeln!(html, "<html>\n<head>\n<meta charset=\"utf-8\">");
        let _ = writeln!(html, "<title>{title}</title>\n</head>\n<body>");
        let _ = writeln!(html, "<h1>{title}</h1>");

        let summary = summary
            .split(HTML_LINE_BREAK)
            .map(escape_html)
            .collect::<Vec<_>>()
            .join(HTML_LINE_BREAK);
        let _ = writeln!(html, "<p>{summary}</p>");

        let _ = writeln!(html, "<table>");
        if let Some((header, rows)) = table.split_first() {
            let _ = writeln!(html, "<thead>{}</thead>", table_row(header, "th"));
            let _ = writeln!(html, "<tbody>");
            for row in rows {
                let _ = writeln!(html, "{}", table_row(row, "td"));
            }
            let _ = writeln!(html, "</tbody>");
        }
        let _ = writeln!(html, "</table>");

        let _ = writeln!(
            html,
            "<footer>Generated {}</footer>",
            Utc::now().format("%Y-%m-%d %H:%M UTC")
        );
        let _ = writeln!(html, "</body>\n</html>");
        html
    }
}

impl DocumentRenderer for HtmlReport {
    #[tracing::instrument(skip_all, fields(path = %self.path.display(), rows = table.len()))]
    fn render(&self, title: &str, summary: &str, table: &[DisplayRow]) -> Result<PathBuf> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating report directory {}", parent.display()))?;
        }

        let html = Self::to_html(title, summary, table);
        fs::write(&self.path, html)
            .with_context(|| format!("writing report {}", self.path.display()))?;

        info!("Report document written");
        Ok(self.path.clone())
    }
}

fn table_row(row: &DisplayRow, cell: &str) -> String {
    let mut out = String::from("<tr>");
    for value in row.cells() {
        let _ = write!(out, "<{cell}>{}</{cell}>", escape_html(value));
    }
    out.push_str("</tr>");
    out
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Writes the display table (header row included) to a CSV file, replacing any existing file.
pub fn write_table_csv(path: &Path, table: &[DisplayRow]) -> Result<()> {
    debug!(path = %path.display(), rows = table.len(), "Writing table CSV");

    let mut writer = WriterBuilder::new()
        .has_headers(false) // header is the first DisplayRow
        .from_path(path)?;

    for row in table {
        writer.write_record(row.cells())?;
    }
    writer.flush()?;

    Ok(())
}

/// Logs any serializable value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
