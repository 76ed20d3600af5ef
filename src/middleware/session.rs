// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Browser session cookie middleware.

use crate::error::AppError;
use crate::session::{SessionStore, SESSION_COOKIE};
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;

/// Browser session resolved from the cookie.
#[derive(Debug, Clone)]
pub struct BrowserSession {
    pub id: String,
}

/// Attach a [`BrowserSession`] to every request, issuing a new cookie when
/// the browser has none or a garbled one.
///
/// A well-formed id the store does not hold is kept and reads as signed out.
/// Nothing is stored here.
pub async fn ensure_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let existing = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|id| SessionStore::is_well_formed(id));

    let (id, jar) = match existing {
        Some(id) => (id, None),
        None => {
            let id = state.sessions.new_id()?;
            tracing::debug!("Issued new browser session");
            let cookie = session_cookie(&id, state.config.is_https());
            (id, Some(jar.add(cookie)))
        }
    };

    request.extensions_mut().insert(BrowserSession { id });
    let response = next.run(request).await;

    Ok(match jar {
        Some(jar) => (jar, response).into_response(),
        None => response,
    })
}

fn session_cookie(id: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("abc", true);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
    }
}
