// SPDX-License-Identifier: GPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Normation SAS

//! Parser for subordinate ID files.
//!
//! The parser is tolerant: comments, blank lines, short lines or non-numeric
//! ranges are left out of the table instead of failing the whole file.
//! Extra fields after the count are ignored.

use std::{
    collections::{HashMap, hash_map},
    convert::Infallible,
    iter::FromIterator,
    num::ParseIntError,
    ops::Range,
    str::FromStr,
};

use crate::{SkipReason, SubIdError, SubIdKind, SubIdRange};

/// One `user:start:count` line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubIdEntry {
    pub user: String,
    pub range: SubIdRange,
}

impl SubIdEntry {
    fn from_line(line: &str) -> Result<Self, SkipReason> {
        if !line.contains(':') {
            return Err(SkipReason::NoSeparator);
        }
        let fields: Vec<&str> = line.split(':').collect();
        if fields.len() < 3 {
            return Err(SkipReason::TooFewFields(fields.len()));
        }
        let start = parse_int(fields[1]).map_err(SkipReason::InvalidStart)?;
        let count = parse_int(fields[2]).map_err(SkipReason::InvalidCount)?;
        Ok(Self {
            user: fields[0].to_string(),
            range: SubIdRange::new(start, count),
        })
    }
}

/// Base-10 integer with optional sign, surrounding whitespace and single `_`
/// between digits (`100_000`).
fn parse_int(field: &str) -> Result<i64, ParseIntError> {
    let field = field.trim_matches(is_space);
    let digits = field.strip_prefix(['+', '-']).unwrap_or(field).as_bytes();
    let separated = digits.iter().enumerate().all(|(i, b)| {
        *b != b'_'
            || (i > 0
                && i + 1 < digits.len()
                && digits[i - 1].is_ascii_digit()
                && digits[i + 1].is_ascii_digit())
    });
    if separated {
        field.replace('_', "").parse()
    } else {
        // fails on the misplaced '_'
        field.parse()
    }
}

/// A line left out of a table, with its location in the parsed content
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based
    pub line: usize,
    /// Byte range of the line, without its line ending
    pub span: Range<usize>,
    pub reason: SkipReason,
}

/// Two users holding overlapping ranges, `first` sorting before `second`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Overlap {
    pub first: String,
    pub first_range: SubIdRange,
    pub second: String,
    pub second_range: SubIdRange,
}

/// Ranges by user, as read from a subordinate ID file
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubIdTable {
    ranges: HashMap<String, SubIdRange>,
}

/// Parse the content of a subordinate ID file.
///
/// Never fails, malformed lines are missing from the result.
pub fn parse(content: &str) -> SubIdTable {
    SubIdTable::parse(content)
}

/// LF, CR, VT, FF, the file, group and record separators, NEL and the
/// Unicode line and paragraph separators
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c'..='\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Unicode whitespace, plus the ASCII separators that are also line breaks
fn is_space(c: char) -> bool {
    c.is_whitespace() || matches!(c, '\x1c'..='\x1f')
}

/// Spans of the lines of `text`, without their line break.
///
/// `\r\n` is a single break, and a trailing break does not start a new line.
fn line_spans(text: &str) -> Vec<Range<usize>> {
    let mut spans = vec![];
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        spans.push(start..i);
        start = i + c.len_utf8();
        if c == '\r' && chars.next_if(|&(_, n)| n == '\n').is_some() {
            start += 1;
        }
    }
    if start < text.len() {
        spans.push(start..text.len());
    }
    spans
}

/// Non-blank lines of the trimmed content, with their number and span in `content`.
fn lines(content: &str) -> impl Iterator<Item = (usize, Range<usize>, &str)> {
    let leading = &content[..content.len() - content.trim_start_matches(is_space).len()];
    let offset = leading.len();
    let first_line = leading.matches(is_line_break).count() - leading.matches("\r\n").count() + 1;
    let trimmed = content.trim_matches(is_space);
    line_spans(trimmed)
        .into_iter()
        .enumerate()
        .filter_map(move |(index, span)| {
            let line = &trimmed[span.clone()];
            if line.trim_matches(is_space).is_empty() {
                None
            } else {
                Some((
                    first_line + index,
                    span.start + offset..span.end + offset,
                    line,
                ))
            }
        })
}

impl SubIdTable {
    pub fn parse(content: &str) -> Self {
        lines(content)
            .filter_map(|(_, _, line)| SubIdEntry::from_line(line).ok())
            .collect()
    }

    /// Same table as [`SubIdTable::parse`], along with the lines that were left out.
    pub fn parse_with_diagnostics(content: &str) -> (Self, Vec<SkippedLine>) {
        let mut table = Self::default();
        let mut skipped = vec![];
        for (line, span, text) in lines(content) {
            match SubIdEntry::from_line(text) {
                Ok(entry) => table.insert(entry),
                Err(reason) => skipped.push(SkippedLine { line, span, reason }),
            }
        }
        (table, skipped)
    }

    /// Replaces any previous range of the same user
    pub fn insert(&mut self, entry: SubIdEntry) {
        self.ranges.insert(entry.user, entry.range);
    }

    pub fn get(&self, user: &str) -> Option<SubIdRange> {
        self.ranges.get(user).copied()
    }

    pub fn contains(&self, user: &str) -> bool {
        self.ranges.contains_key(user)
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// In arbitrary order
    pub fn iter(&self) -> hash_map::Iter<'_, String, SubIdRange> {
        self.ranges.iter()
    }

    /// Sorted by user
    pub fn entries(&self) -> Vec<SubIdEntry> {
        let mut entries: Vec<SubIdEntry> = self
            .ranges
            .iter()
            .map(|(user, range)| SubIdEntry {
                user: user.clone(),
                range: *range,
            })
            .collect();
        entries.sort_by(|a, b| a.user.cmp(&b.user));
        entries
    }

    pub fn require(&self, kind: SubIdKind, user: &str) -> Result<SubIdRange, SubIdError> {
        self.get(user).ok_or_else(|| SubIdError::MissingEntry {
            kind,
            user: user.to_string(),
        })
    }

    /// All pairs of users with overlapping ranges
    pub fn overlapping_pairs(&self) -> Vec<Overlap> {
        let entries = self.entries();
        let mut overlaps = vec![];
        for (i, a) in entries.iter().enumerate() {
            for b in &entries[i + 1..] {
                if a.range.overlaps(&b.range) {
                    overlaps.push(Overlap {
                        first: a.user.clone(),
                        first_range: a.range,
                        second: b.user.clone(),
                        second_range: b.range,
                    });
                }
            }
        }
        overlaps
    }

    /// Check that every given user has a range, and that these ranges are disjoint.
    ///
    /// Returns the first failure, in the order of `users`.
    pub fn check_disjoint<S: AsRef<str>>(
        &self,
        kind: SubIdKind,
        users: &[S],
    ) -> Result<(), SubIdError> {
        let ranges = users
            .iter()
            .map(|u| self.require(kind, u.as_ref()).map(|r| (u.as_ref(), r)))
            .collect::<Result<Vec<_>, _>>()?;
        for (i, (first, first_range)) in ranges.iter().enumerate() {
            for (second, second_range) in &ranges[i + 1..] {
                if first != second && first_range.overlaps(second_range) {
                    return Err(SubIdError::Overlap {
                        kind,
                        first: first.to_string(),
                        first_range: *first_range,
                        second: second.to_string(),
                        second_range: *second_range,
                    });
                }
            }
        }
        Ok(())
    }
}

impl FromIterator<SubIdEntry> for SubIdTable {
    /// > If an account has several lines, the last one is kept.
    fn from_iter<I: IntoIterator<Item = SubIdEntry>>(entries: I) -> Self {
        let mut table = Self::default();
        for entry in entries {
            table.insert(entry);
        }
        table
    }
}

impl FromStr for SubIdTable {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}
