// SPDX-License-Identifier: GPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Normation SAS

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};
use subid::SubIdKind;

use crate::logs::OutputFormat;

/// Verify subordinate ID delegation of rootless accounts
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Account expected to own a subordinate range
    #[arg(short, long = "user", value_name = "USER", required = true)]
    pub users: Vec<String>,

    /// Subordinate UID file
    #[arg(long, value_name = "FILE", default_value_os_t = SubIdKind::Uid.default_path().to_path_buf())]
    pub subuid: PathBuf,

    /// Subordinate GID file
    #[arg(long, value_name = "FILE", default_value_os_t = SubIdKind::Gid.default_path().to_path_buf())]
    pub subgid: PathBuf,

    /// Only check one file (uid or gid)
    #[arg(short, long)]
    pub kind: Option<SubIdKind>,

    /// Fail on malformed lines
    #[arg(long)]
    pub strict: bool,

    /// Output format (human or json)
    #[arg(long, default_value_t = OutputFormat::Human)]
    pub message_format: OutputFormat,

    /// Verbose
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Quiet
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Kinds to check, in order
    pub fn kinds(&self) -> Vec<SubIdKind> {
        match self.kind {
            Some(k) => vec![k],
            None => vec![SubIdKind::Uid, SubIdKind::Gid],
        }
    }

    pub fn path(&self, kind: SubIdKind) -> &Path {
        match kind {
            SubIdKind::Uid => &self.subuid,
            SubIdKind::Gid => &self.subgid,
        }
    }
}
