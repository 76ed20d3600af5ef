// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod user;
pub mod weight;

pub use user::{Profile, SessionToken};
pub use weight::{AggregateRequest, AggregateResponse, WeightSample};
