// SPDX-License-Identifier: GPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Normation SAS

use std::num::ParseIntError;

use thiserror::Error;

use crate::{SubIdKind, SubIdRange};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubIdError {
    #[error("missing {kind} entry for {user}")]
    MissingEntry { kind: SubIdKind, user: String },
    #[error("{kind} ranges overlap between {first} {first_range} and {second} {second_range}")]
    Overlap {
        kind: SubIdKind,
        first: String,
        first_range: SubIdRange,
        second: String,
        second_range: SubIdRange,
    },
    #[error("unknown subordinate id kind '{0}', expected 'uid' or 'gid'")]
    UnknownKind(String),
}

/// Why a line was left out of a parsed table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("no ':' separator")]
    NoSeparator,
    #[error("expected at least 3 fields, found {0}")]
    TooFewFields(usize),
    #[error("invalid range start: {0}")]
    InvalidStart(ParseIntError),
    #[error("invalid range count: {0}")]
    InvalidCount(ParseIntError),
}
