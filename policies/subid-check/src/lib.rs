// SPDX-License-Identifier: GPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Normation SAS

pub mod cli;
pub mod diagnostic;
pub mod logs;

use std::{
    fs::read_to_string,
    panic,
    path::{Path, PathBuf},
    process::exit,
};

use anyhow::{Context, Result};
use serde::Serialize;
use subid::{SkippedLine, SubIdKind, SubIdTable};
use tracing::{Level, debug, enabled, warn};

use crate::{
    cli::Args,
    diagnostic::FileDiagnostic,
    logs::{OutputFormat, fail_output, ok_output},
};

// taken from https://github.com/yamafaktory/jql/commit/12f5110b3443c33c09cf60d03fe638c2c266de98
// under MIT/Apache 2 license

/// Use a custom hook to manage broken pipe errors.
///
/// See https://github.com/rust-lang/rust/issues/46016 for cause.
pub fn custom_panic_hook_ignore_sigpipe() {
    let hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let panic_message = panic_info.to_string();
        if panic_message.contains("Broken pipe") || panic_message.contains("os error 32") {
            exit(0);
        }
        (hook)(panic_info)
    }));
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    Passed,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skipped {
    pub line: usize,
    pub reason: String,
}

impl From<&SkippedLine> for Skipped {
    fn from(s: &SkippedLine) -> Self {
        Self {
            line: s.line,
            reason: s.reason.to_string(),
        }
    }
}

/// Result of the verification of one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub kind: SubIdKind,
    pub path: PathBuf,
    pub users: Vec<String>,
    pub outcome: Outcome,
    pub skipped: Vec<Skipped>,
}

impl CheckResult {
    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Passed
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub checks: Vec<CheckResult>,
}

impl Report {
    pub fn is_success(&self) -> bool {
        self.checks.iter().all(|c| c.is_success())
    }

    pub fn print(&self, format: OutputFormat) -> Result<()> {
        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(self)?),
            OutputFormat::Human => {
                for check in &self.checks {
                    match &check.outcome {
                        Outcome::Passed => ok_output(
                            "Checked",
                            format!(
                                "{} ranges of {} in '{}'",
                                check.kind,
                                check.users.join(", "),
                                check.path.display()
                            ),
                        ),
                        Outcome::Failed { reason } => {
                            fail_output("Failed", format!("'{}': {reason}", check.path.display()))
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// Main entry point
///
/// Stops at the first file that cannot be read. Failed checks are part of
/// the returned report.
pub fn run(args: &Args) -> Result<Report> {
    let checks = args
        .kinds()
        .into_iter()
        .map(|kind| check_file(kind, args.path(kind), &args.users, args.strict))
        .collect::<Result<Vec<_>>>()?;
    Ok(Report { checks })
}

pub fn check_file(
    kind: SubIdKind,
    path: &Path,
    users: &[String],
    strict: bool,
) -> Result<CheckResult> {
    let content = read_to_string(path)
        .with_context(|| format!("Could not read {kind} file '{}'", path.display()))?;
    debug!("Read {} bytes from '{}'", content.len(), path.display());
    Ok(check_content(kind, path, &content, users, strict))
}

/// Check the content of a subordinate ID file, `path` is only used for display.
pub fn check_content(
    kind: SubIdKind,
    path: &Path,
    content: &str,
    users: &[String],
    strict: bool,
) -> CheckResult {
    let (table, skipped) = SubIdTable::parse_with_diagnostics(content);
    debug!(
        "Found {} {kind} entries in '{}'",
        table.len(),
        path.display()
    );
    for s in &skipped {
        warn!(
            "Skipped line {} of '{}': {}",
            s.line,
            path.display(),
            s.reason
        );
        if enabled!(Level::DEBUG) {
            let file_name = path.display().to_string();
            let reason = s.reason.to_string();
            match FileDiagnostic::new(
                "Skipped line",
                &reason,
                s.span.clone(),
                &file_name,
                content,
                Some("This line is ignored when checking ranges"),
            )
            .render(false)
            {
                Ok(r) => debug!("\n{r}"),
                Err(e) => debug!("Could not render diagnostic: {e:#}"),
            }
        }
    }
    for overlap in table.overlapping_pairs() {
        debug!(
            "{kind} ranges of {} {} and {} {} overlap",
            overlap.first, overlap.first_range, overlap.second, overlap.second_range
        );
    }

    let outcome = match table.check_disjoint(kind, users) {
        Err(e) => Outcome::Failed {
            reason: e.to_string(),
        },
        Ok(()) if strict && !skipped.is_empty() => Outcome::Failed {
            reason: format!("{} malformed line(s) in {kind} file", skipped.len()),
        },
        Ok(()) => Outcome::Passed,
    };
    CheckResult {
        kind,
        path: path.to_path_buf(),
        users: users.to_vec(),
        outcome,
        skipped: skipped.iter().map(Skipped::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn users() -> Vec<String> {
        vec!["ansible".to_string(), "devuser".to_string()]
    }

    #[test]
    fn it_passes_with_disjoint_ranges() {
        let result = check_content(
            SubIdKind::Uid,
            Path::new("/etc/subuid"),
            "ansible:100000:65536\ndevuser:165536:65536\n",
            &users(),
            true,
        );
        assert_eq!(
            result,
            CheckResult {
                kind: SubIdKind::Uid,
                path: PathBuf::from("/etc/subuid"),
                users: users(),
                outcome: Outcome::Passed,
                skipped: vec![],
            }
        );
    }

    #[test]
    fn it_fails_with_overlapping_ranges() {
        let result = check_content(
            SubIdKind::Gid,
            Path::new("/etc/subgid"),
            "ansible:100000:65536\ndevuser:130000:65536\n",
            &users(),
            false,
        );
        assert_eq!(
            result.outcome,
            Outcome::Failed {
                reason: "subgid ranges overlap between ansible [100000, 165536) and devuser [130000, 195536)".to_string()
            }
        );
    }

    #[test]
    fn it_fails_with_a_missing_user() {
        let result = check_content(
            SubIdKind::Uid,
            Path::new("/etc/subuid"),
            "ansible:100000:65536\n",
            &users(),
            false,
        );
        assert_eq!(
            result.outcome,
            Outcome::Failed {
                reason: "missing subuid entry for devuser".to_string()
            }
        );
    }

    #[test]
    fn it_only_fails_on_malformed_lines_in_strict_mode() {
        let content = "ansible:100000:65536\ndevuser:165536:65536\nbroken:abc:1\n";
        let lenient = check_content(SubIdKind::Uid, Path::new("f"), content, &users(), false);
        assert!(lenient.is_success());
        assert_eq!(
            lenient.skipped,
            vec![Skipped {
                line: 3,
                reason: "invalid range start: invalid digit found in string".to_string()
            }]
        );
        let strict = check_content(SubIdKind::Uid, Path::new("f"), content, &users(), true);
        assert_eq!(
            strict.outcome,
            Outcome::Failed {
                reason: "1 malformed line(s) in subuid file".to_string()
            }
        );
    }

    #[test]
    fn it_serializes_reports() {
        let report = Report {
            checks: vec![CheckResult {
                kind: SubIdKind::Gid,
                path: PathBuf::from("/etc/subgid"),
                users: vec!["ansible".to_string()],
                outcome: Outcome::Failed {
                    reason: "missing subgid entry for ansible".to_string(),
                },
                skipped: vec![Skipped {
                    line: 1,
                    reason: "no ':' separator".to_string(),
                }],
            }],
        };
        assert!(!report.is_success());
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            serde_json::json!({
                "checks": [{
                    "kind": "subgid",
                    "path": "/etc/subgid",
                    "users": ["ansible"],
                    "outcome": {"status": "failed", "reason": "missing subgid entry for ansible"},
                    "skipped": [{"line": 1, "reason": "no ':' separator"}]
                }]
            })
        );
        assert!(Report::default().is_success());
    }
}
