//! End-to-end report run: aggregate, summarize, render, compose the email.

use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

use crate::aggregate::aggregate;
use crate::config::ReportConfig;
use crate::error::AggregateError;
use crate::mail::EmailMessage;
use crate::narrative::{HTML_LINE_BREAK, join_lines, summarize};
use crate::output::{DocumentRenderer, HtmlReport, write_table_csv};
use crate::records::CarRecord;
use crate::table::{DisplayRow, cars_to_table};

pub const DOCUMENT_NAME: &str = "cars.html";
pub const TABLE_NAME: &str = "cars.csv";
pub const MESSAGE_NAME: &str = "report.eml";

/// Summary lines and display table for one record set.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub summary: [String; 3],
    pub table: Vec<DisplayRow>,
}

/// Paths of everything a report run wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifacts {
    pub document: PathBuf,
    pub table: PathBuf,
    pub message: PathBuf,
}

/// Aggregates and projects `records`. Fails before anything is rendered.
pub fn build_report(
    records: &[CarRecord],
    config: &ReportConfig,
) -> Result<Report, AggregateError> {
    let result = aggregate(records, &config.format)?;
    Ok(Report {
        summary: summarize(&result, &config.format),
        table: cars_to_table(records),
    })
}

/// Writes the document, the CSV table and the composed email into `config.output_dir`.
#[tracing::instrument(skip_all, fields(output_dir = %config.output_dir.display()))]
pub fn publish(
    report: &Report,
    config: &ReportConfig,
    renderer: &impl DocumentRenderer,
) -> Result<ReportArtifacts> {
    std::fs::create_dir_all(&config.output_dir)?;

    let document = renderer.render(
        &config.title,
        &join_lines(&report.summary, HTML_LINE_BREAK),
        &report.table,
    )?;

    let table = config.output_dir.join(TABLE_NAME);
    write_table_csv(&table, &report.table)?;

    let message = config.output_dir.join(MESSAGE_NAME);
    EmailMessage::generate(
        &config.sender,
        &config.recipient,
        &config.title,
        &join_lines(&report.summary, "\n"),
        &document,
    )?
    .write_to(&message)?;

    info!(
        document = %document.display(),
        message = %message.display(),
        "Report published"
    );

    Ok(ReportArtifacts {
        document,
        table,
        message,
    })
}

/// Runs [`build_report`] then [`publish`] with the default HTML renderer.
pub fn run(records: &[CarRecord], config: &ReportConfig) -> Result<ReportArtifacts> {
    let report = build_report(records, config)?;
    let renderer = HtmlReport::new(config.output_dir.join(DOCUMENT_NAME));
    publish(&report, config, &renderer)
}
