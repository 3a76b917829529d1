// SPDX-License-Identifier: GPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Normation SAS

//! Subordinate user and group IDs, as delegated in `/etc/subuid` and `/etc/subgid`.
//!
//! Each line of these files grants a block of IDs to an account, mostly for
//! user namespace remapping in rootless containers:
//!
//! ```text
//! ansible:100000:65536
//! devuser:165536:65536
//! ```
//!
//! See subuid(5) and subgid(5).

mod error;
mod range;
mod table;

use std::{
    fmt::{self, Display, Formatter},
    path::Path,
    str::FromStr,
};

use serde::Serialize;

pub use crate::{
    error::{SkipReason, SubIdError},
    range::{SubIdRange, overlaps},
    table::{Overlap, SkippedLine, SubIdEntry, SubIdTable, parse},
};

const SUBUID_PATH: &str = "/etc/subuid";
const SUBGID_PATH: &str = "/etc/subgid";

/// Which subordinate ID file a table comes from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SubIdKind {
    #[serde(rename = "subuid")]
    Uid,
    #[serde(rename = "subgid")]
    Gid,
}

impl SubIdKind {
    pub fn default_path(self) -> &'static Path {
        Path::new(match self {
            Self::Uid => SUBUID_PATH,
            Self::Gid => SUBGID_PATH,
        })
    }
}

impl Display for SubIdKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Uid => "subuid",
                Self::Gid => "subgid",
            }
        )
    }
}

impl FromStr for SubIdKind {
    type Err = SubIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "uid" | "subuid" => Self::Uid,
            "gid" | "subgid" => Self::Gid,
            _ => return Err(SubIdError::UnknownKind(s.to_string())),
        })
    }
}
