// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod flash;
pub mod report;
pub mod user;

pub use flash::{FlashColumns, FlashRow, RawNumber};
pub use report::{CorrelationEntry, CorrelationReport};
pub use user::User;
