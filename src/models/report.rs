// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Session/issue correlation report.

use serde::Serialize;
use std::collections::BTreeMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// FullStory sessions and GitHub issues attributed to one uid.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CorrelationEntry {
    pub session_urls: Vec<String>,
    pub issues: Vec<String>,
}

/// Report keyed by pseudonymous uid.
pub type CorrelationReport = BTreeMap<String, CorrelationEntry>;
