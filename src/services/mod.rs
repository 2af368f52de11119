// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod correlator;
pub mod feedback;
pub mod fullstory;
pub mod github;
pub mod identity;
pub mod uid;

pub use fullstory::FullStoryClient;
pub use github::GitHubClient;
pub use uid::derive_uid;
