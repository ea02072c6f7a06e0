// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `@name` mention extraction.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use switchboard_core::normalize_name;

// Code spans are removed before matching. Fenced blocks go first because they
// may contain single backticks.
static CODE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```[\s\S]*?```").expect("code block pattern is valid"));
static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`[^`\n]+`").expect("inline code pattern is valid"));
// The `@` must start the text or follow a non-alphanumeric character, so
// `user@host` is not a mention. Name characters are the ones agent names may
// use: Unicode letters and digits plus `-` and `_`.
static MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^\p{Alphabetic}\p{N}])@([\p{Alphabetic}\p{N}_-]+)")
        .expect("mention pattern is valid")
});

/// Extract the set of known agents addressed by `text`.
///
/// Matching is case-insensitive and names outside `known` are dropped. A
/// `@<wildcard>` marker anywhere yields the whole known set. Never fails.
pub fn parse_mentions<S: AsRef<str>>(text: &str, known: &[S], wildcard: &str) -> BTreeSet<String> {
    let known: BTreeSet<String> = known.iter().map(|n| normalize_name(n.as_ref())).collect();
    let wildcard = normalize_name(wildcard);

    let without_blocks = CODE_BLOCK.replace_all(text, " ");
    let stripped = INLINE_CODE.replace_all(&without_blocks, " ");

    let mut found = BTreeSet::new();
    for cap in MARKER.captures_iter(&stripped) {
        let name = normalize_name(&cap[1]);
        if !wildcard.is_empty() && name == wildcard {
            return known;
        }
        if known.contains(&name) {
            found.insert(name);
        }
    }
    found
}
