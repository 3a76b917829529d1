// SPDX-License-Identifier: GPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Normation SAS

use std::ops::Range;

use anyhow::Result;
use ariadne::{Config, IndexType, Label, Report, ReportKind, Source};

/// Compiler-like warning in a file, pointing at a line
///
/// Example:
///
/// ```text
/// Warning: Skipped line
///    ╭─[ /etc/subuid:2:1 ]
///    │
///  2 │ devuser:abc:65536
///    │ ────────┬────────
///    │         ╰────────── invalid range start: invalid digit found in string
///    │
///    │ Note: This line is ignored when checking ranges
/// ───╯
/// ```
pub struct FileDiagnostic<'a> {
    title: &'a str,
    message: &'a str,
    /// Byte range in `file_content`
    range: Range<usize>,
    file_name: &'a str,
    file_content: &'a str,
    note: Option<&'a str>,
}

impl<'a> FileDiagnostic<'a> {
    pub fn new(
        title: &'a str,
        message: &'a str,
        range: Range<usize>,
        file_name: &'a str,
        file_content: &'a str,
        note: Option<&'a str>,
    ) -> Self {
        Self {
            title,
            message,
            range,
            file_name,
            file_content,
            note,
        }
    }

    pub fn render(&self, color: bool) -> Result<String> {
        let span = (self.file_name, self.range.clone());
        let mut report = Report::build(ReportKind::Warning, span.clone())
            .with_config(
                Config::default()
                    .with_index_type(IndexType::Byte)
                    .with_color(color),
            )
            .with_message(self.title)
            .with_label(Label::new(span).with_message(self.message));
        if let Some(n) = self.note {
            report = report.with_note(n);
        }
        let mut out = vec![];
        report
            .finish()
            .write((self.file_name, Source::from(self.file_content)), &mut out)?;
        Ok(String::from_utf8_lossy(&out).to_string())
    }
}
