// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Feedback issue composition.

use crate::services::github::NewIssue;
use serde::Deserialize;

/// Separator between the user's text and the metadata footer.
pub const METADATA_HEADER: &str =
    "\n\n\n------------ Issue Metadata (DO NOT MODIFY) --------------------";
/// Prefix of the footer line carrying the submitter's uid.
pub const UID_LINE_PREFIX: &str = "\nUnique issue identifier: ";

/// Kind of feedback a user files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueType {
    Feature,
    Bug,
}

impl IssueType {
    /// GitHub label applied to the issue.
    pub fn label(self) -> &'static str {
        match self {
            IssueType::Feature => "enhancement",
            IssueType::Bug => "bug",
        }
    }
}

/// Build the GitHub issue for a piece of feedback.
///
/// Title and body are HTML-escaped and the body gets a footer with `uid`.
pub fn compose_issue(issue_type: IssueType, title: &str, body: &str, uid: &str) -> NewIssue {
    let mut full_body = escape_html(body);
    full_body.push_str(METADATA_HEADER);
    full_body.push_str(UID_LINE_PREFIX);
    full_body.push_str(uid);

    NewIssue {
        title: escape_html(title),
        body: full_body,
        labels: vec![issue_type.label().to_string()],
    }
}

/// Escape `&`, `<`, `>`, `"` and `'` for safe inclusion in HTML.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
