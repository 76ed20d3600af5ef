// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Middleware modules (browser session, security headers).

pub mod security;
pub mod session;

pub use session::{ensure_session, BrowserSession};
