// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cross-reference GitHub issues with FullStory sessions by uid.

use crate::error::AppError;
use crate::models::{CorrelationEntry, CorrelationReport, User};
use crate::services::fullstory::FullStoryClient;
use crate::services::github::{GitHubClient, GitHubIssue};
use crate::services::uid::derive_uid;
use regex::Regex;
use std::sync::LazyLock;

/// Maximum FullStory sessions listed per user.
pub const MAX_SESSIONS_PER_USER: usize = 20;

static ISSUE_UID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Unique issue identifier: (.*)").expect("issue uid pattern is valid")
});

/// Where to find the tracking repository and with which credential.
pub struct TrackingRepo<'a> {
    pub owner: &'a str,
    pub name: &'a str,
    pub access_token: &'a str,
}

/// Pull the uid out of an issue body's metadata footer.
///
/// The footer is always appended after the user's text, so the last
/// identifier line wins over any the user typed into the body.
pub fn extract_issue_uid(body: &str) -> Option<&str> {
    ISSUE_UID_PATTERN
        .captures_iter(body)
        .last()
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim_end())
        .filter(|uid| !uid.is_empty())
}

/// File each issue under the uid found in its body.
///
/// Issues without a footer are ignored. Issues whose uid is not in the
/// report are logged and skipped. Returns how many were skipped that way.
pub fn attach_issues(report: &mut CorrelationReport, issues: &[GitHubIssue]) -> usize {
    let mut unmatched = 0;
    for issue in issues {
        let Some(uid) = issue.body.as_deref().and_then(extract_issue_uid) else {
            continue;
        };
        match report.get_mut(uid) {
            Some(entry) => entry.issues.push(issue.html_url.clone()),
            None => {
                unmatched += 1;
                tracing::warn!(
                    issue = issue.number,
                    url = %issue.html_url,
                    "Issue uid does not match any known user, skipping"
                );
            }
        }
    }
    unmatched
}

/// Build the full correlation report for `users`.
pub async fn build_report(
    users: &[User],
    secret_key: &[u8],
    fullstory: &FullStoryClient,
    github: &GitHubClient,
    repo: &TrackingRepo<'_>,
) -> Result<CorrelationReport, AppError> {
    let mut report = CorrelationReport::new();

    for user in users {
        let Some(email) = user.github_email.as_deref() else {
            tracing::debug!(user_id = user.id, "User has no email, no uid to correlate");
            continue;
        };
        let uid = derive_uid(secret_key, email);
        let session_urls = fullstory
            .session_urls(&uid, MAX_SESSIONS_PER_USER)
            .await?;
        report.insert(
            uid,
            CorrelationEntry {
                session_urls,
                issues: Vec::new(),
            },
        );
    }

    let issues = github
        .list_open_issues(repo.access_token, repo.owner, repo.name)
        .await?;
    let unmatched = attach_issues(&mut report, &issues);

    tracing::info!(
        users = report.len(),
        issues = issues.len(),
        unmatched,
        "Built session correlation report"
    );
    Ok(report)
}
