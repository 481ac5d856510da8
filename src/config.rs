use anyhow::{Result, anyhow};
use std::path::PathBuf;

use crate::currency::NumericFormat;

pub const DEFAULT_SENDER: &str = "automation@example.com";
pub const DEFAULT_TITLE: &str = "Sales summary for last month";
pub const DEFAULT_LOCALE: &str = "en_US";

/// Settings for one report run.
///
/// Each value comes from the command line if given, then from the environment
/// (`REPORT_SENDER`, `REPORT_RECIPIENT`, `REPORT_TITLE`, `REPORT_LOCALE`), then
/// from the defaults above. The recipient has no default.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub sender: String,
    pub recipient: String,
    pub title: String,
    pub format: NumericFormat,
    pub output_dir: PathBuf,
}

/// Raw, possibly-missing settings as given on the command line.
#[derive(Debug, Default, Clone)]
pub struct ReportOverrides {
    pub sender: Option<String>,
    pub recipient: Option<String>,
    pub title: Option<String>,
    pub locale: Option<String>,
}

impl ReportConfig {
    pub fn resolve(overrides: ReportOverrides, output_dir: PathBuf) -> Result<Self> {
        Self::resolve_with(overrides, output_dir, |key| std::env::var(key).ok())
    }

    /// Same as [`resolve`](Self::resolve) with an injectable environment lookup.
    pub fn resolve_with(
        overrides: ReportOverrides,
        output_dir: PathBuf,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let sender = overrides
            .sender
            .or_else(|| env("REPORT_SENDER"))
            .unwrap_or_else(|| DEFAULT_SENDER.to_string());
        let recipient = overrides
            .recipient
            .or_else(|| env("REPORT_RECIPIENT"))
            .ok_or_else(|| anyhow!("recipient not set (use --recipient or REPORT_RECIPIENT)"))?;
        let title = overrides
            .title
            .or_else(|| env("REPORT_TITLE"))
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let format = resolve_format(overrides.locale, &env)?;

        Ok(ReportConfig {
            sender,
            recipient,
            title,
            format,
            output_dir,
        })
    }
}

/// Resolves the numeric format from an explicit locale, `REPORT_LOCALE`, or `en_US`.
pub fn resolve_format(
    locale: Option<String>,
    env: &impl Fn(&str) -> Option<String>,
) -> Result<NumericFormat> {
    let locale = locale
        .or_else(|| env("REPORT_LOCALE"))
        .unwrap_or_else(|| DEFAULT_LOCALE.to_string());
    NumericFormat::from_locale(&locale).ok_or_else(|| anyhow!("unsupported locale {locale:?}"))
}
