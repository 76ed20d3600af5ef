// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - Google API access and the post-login fetch.

pub mod fetcher;
pub mod google;

pub use fetcher::{fetch_dashboard, normalize_weight_buckets, spawn_fetch};
pub use google::GoogleClient;
