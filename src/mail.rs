//! Composes the report email with the rendered document attached.
//!
//! Messages are written out as `.eml` files; sending them is left to whatever
//! mail transport the deployment uses.

use anyhow::{Context, Result, bail};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use std::fs;
use std::path::Path;
use tracing::info;

const BOUNDARY: &str = "car-sales-report-boundary";
const BASE64_LINE_LEN: usize = 76;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub content_type: &'static str,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub attachment: Attachment,
}

impl EmailMessage {
    /// Builds a message, reading the attachment from `attachment_path`.
    ///
    /// Header values may not contain line breaks.
    pub fn generate(
        sender: &str,
        recipient: &str,
        subject: &str,
        body: &str,
        attachment_path: &Path,
    ) -> Result<Self> {
        for (name, value) in [("sender", sender), ("recipient", recipient), ("subject", subject)] {
            if value.contains(['\r', '\n']) {
                bail!("{name} {value:?} contains a line break");
            }
        }

        let data = fs::read(attachment_path)
            .with_context(|| format!("reading attachment {}", attachment_path.display()))?;
        let filename = attachment_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("attachment")
            .to_string();

        Ok(EmailMessage {
            sender: sender.to_string(),
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
            attachment: Attachment {
                content_type: content_type_for(&filename),
                filename,
                data,
            },
        })
    }

    /// Renders the message as `multipart/mixed` MIME text.
    pub fn to_mime(&self) -> String {
        let encoded = STANDARD.encode(&self.attachment.data);
        let mut lines = vec![
            format!("From: {}", self.sender),
            format!("To: {}", self.recipient),
            format!("Subject: {}", encode_header(&self.subject)),
            format!("Date: {}", Utc::now().to_rfc2822()),
            "MIME-Version: 1.0".to_string(),
            format!("Content-Type: multipart/mixed; boundary=\"{BOUNDARY}\""),
            String::new(),
            format!("--{BOUNDARY}"),
            "Content-Type: text/plain; charset=utf-8".to_string(),
            "Content-Transfer-Encoding: 8bit".to_string(),
            String::new(),
            crlf_lines(&self.body),
            String::new(),
            format!("--{BOUNDARY}"),
            format!(
                "Content-Type: {}; name=\"{}\"",
                self.attachment.content_type, self.attachment.filename
            ),
            "Content-Transfer-Encoding: base64".to_string(),
            format!(
                "Content-Disposition: attachment; filename=\"{}\"",
                self.attachment.filename
            ),
            String::new(),
        ];

        // base64 output is ASCII, so splitting on byte offsets is safe.
        lines.extend(
            encoded
                .as_bytes()
                .chunks(BASE64_LINE_LEN)
                .map(|chunk| String::from_utf8_lossy(chunk).into_owned()),
        );
        lines.push(format!("--{BOUNDARY}--"));
        lines.push(String::new());

        lines.join("\r\n")
    }

    #[tracing::instrument(skip_all, fields(path = %path.display(), recipient = %self.recipient))]
    pub fn write_to(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_mime())
            .with_context(|| format!("writing message {}", path.display()))?;
        info!(attachment = %self.attachment.filename, "Email message composed");
        Ok(())
    }
}

/// RFC 2047 encoded-word for non-ASCII header values; ASCII passes through.
fn encode_header(value: &str) -> String {
    if value.is_ascii() {
        value.to_string()
    } else {
        format!("=?utf-8?B?{}?=", STANDARD.encode(value))
    }
}

fn crlf_lines(text: &str) -> String {
    text.lines().collect::<Vec<_>>().join("\r\n")
}

fn content_type_for(filename: &str) -> &'static str {
    match Path::new(filename).extension().and_then(|ext| ext.to_str()) {
        Some("html") | Some("htm") => "text/html",
        Some("pdf") => "application/pdf",
        Some("csv") => "text/csv",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_message(dir: &Path) -> EmailMessage {
        let attachment = dir.join("cars.html");
        fs::write(&attachment, "<p>report</p>").unwrap();
        EmailMessage::generate(
            "automation@example.com",
            "someone@example.com",
            "Sales summary",
            "line one\nline two",
            &attachment,
        )
        .unwrap()
    }

    #[test]
    fn test_generate_reads_attachment() {
        let dir = tempfile::tempdir().unwrap();
        let message = sample_message(dir.path());

        assert_eq!(message.attachment.filename, "cars.html");
        assert_eq!(message.attachment.content_type, "text/html");
        assert_eq!(message.attachment.data, b"<p>report</p>");
    }

    #[test]
    fn test_generate_missing_attachment() {
        let dir = tempfile::tempdir().unwrap();
        let result = EmailMessage::generate("a@x", "b@x", "s", "b", &dir.path().join("nope.pdf"));
        assert!(result.is_err());
    }

    #[test]
    fn test_mime_structure() {
        let dir = tempfile::tempdir().unwrap();
        let mime = sample_message(dir.path()).to_mime();

        assert!(mime.starts_with("From: automation@example.com\r\nTo: someone@example.com\r\n"));
        assert!(mime.contains("Subject: Sales summary\r\n"));
        assert!(mime.contains("\r\n\r\nline one\r\nline two\r\n"));
        assert!(!mime.contains("one\ntwo"));
        assert!(mime.contains("filename=\"cars.html\""));
        assert!(mime.contains(&STANDARD.encode("<p>report</p>")));
        assert!(mime.trim_end().ends_with(&format!("--{BOUNDARY}--")));
        assert_eq!(mime.matches(&format!("--{BOUNDARY}\r\n")).count(), 2);
    }

    #[test]
    fn test_generate_rejects_header_line_breaks() {
        let dir = tempfile::tempdir().unwrap();
        let attachment = dir.path().join("cars.html");
        fs::write(&attachment, "x").unwrap();

        for (sender, recipient, subject) in [
            ("a@x", "b@x", "Sales\r\nBcc: evil@x"),
            ("a@x\nBcc: evil@x", "b@x", "Sales"),
            ("a@x", "b@x\r", "Sales"),
        ] {
            let result = EmailMessage::generate(sender, recipient, subject, "body", &attachment);
            assert!(result.is_err(), "{sender:?} {recipient:?} {subject:?}");
        }
    }

    #[test]
    fn test_non_ascii_subject_is_encoded() {
        let dir = tempfile::tempdir().unwrap();
        let attachment = dir.path().join("cars.html");
        fs::write(&attachment, "x").unwrap();

        let mime = EmailMessage::generate("a@x", "b@x", "Verkäufe", "body", &attachment)
            .unwrap()
            .to_mime();

        assert!(mime.contains(&format!("Subject: =?utf-8?B?{}?=\r\n", STANDARD.encode("Verkäufe"))));
        assert!(!mime.contains("Verkäufe"));
    }

    #[test]
    fn test_write_to() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.eml");
        sample_message(dir.path()).write_to(&path).unwrap();

        assert!(fs::read_to_string(&path).unwrap().contains("MIME-Version: 1.0"));
    }
}
