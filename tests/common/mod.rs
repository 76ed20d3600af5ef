// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared test helpers: a fake Google API served on a local port.

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderMap, Request, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use coach_weight::config::Config;
use coach_weight::routes::create_router;
use coach_weight::AppState;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

#[allow(dead_code)]
pub const TEST_TOKEN: &str = "ya29.test-access-token";

/// Canned responses for each Google endpoint.
#[derive(Clone)]
pub struct FakeGoogle {
    pub token: (StatusCode, Value),
    pub profile: (StatusCode, Value),
    pub aggregate: (StatusCode, Value),
    /// Delay before the aggregate endpoint answers.
    pub aggregate_delay: Duration,
    /// Aggregate request bodies received, in order.
    pub aggregate_requests: Arc<Mutex<Vec<Value>>>,
}

impl Default for FakeGoogle {
    fn default() -> Self {
        Self {
            token: (
                StatusCode::OK,
                json!({
                    "access_token": TEST_TOKEN,
                    "token_type": "Bearer",
                    "expires_in": 3599,
                    "scope": "openid https://www.googleapis.com/auth/fitness.body.read"
                }),
            ),
            profile: (StatusCode::OK, sample_profile()),
            aggregate: (StatusCode::OK, sample_aggregate()),
            aggregate_delay: Duration::ZERO,
            aggregate_requests: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[allow(dead_code)]
pub fn sample_profile() -> Value {
    json!({
        "id": "1234567890",
        "email": "ada@example.com",
        "verified_email": true,
        "name": "Ada Lovelace",
        "picture": "https://lh3.googleusercontent.com/a/ada.jpg"
    })
}

/// Three buckets, only the first holding a reading.
#[allow(dead_code)]
pub fn sample_aggregate() -> Value {
    json!({
        "bucket": [
            {
                "startTimeMillis": "1699920000000",
                "endTimeMillis": "1700006400000",
                "dataset": [{
                    "dataSourceId": "derived:com.google.weight.summary:com.google.android.gms:aggregated",
                    "point": [{
                        "startTimeNanos": "1700000000000000000",
                        "endTimeNanos": "1700000000000000000",
                        "dataTypeName": "com.google.weight.summary",
                        "value": [{"fpVal": 70.5}, {"fpVal": 70.5}, {"fpVal": 70.5}]
                    }]
                }]
            },
            {
                "startTimeMillis": "1700006400000",
                "endTimeMillis": "1700092800000",
                "dataset": [{"point": []}]
            },
            {
                "startTimeMillis": "1700092800000",
                "endTimeMillis": "1700179200000",
                "dataset": [{"point": []}]
            }
        ]
    })
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(|h| h == format!("Bearer {}", TEST_TOKEN))
        .unwrap_or(false)
}

async fn token(State(fake): State<FakeGoogle>) -> impl IntoResponse {
    (fake.token.0, Json(fake.token.1))
}

async fn userinfo(
    State(fake): State<FakeGoogle>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    if !authorized(&headers) || query.get("access_token").map(String::as_str) != Some(TEST_TOKEN)
    {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "invalid_token"})));
    }
    (fake.profile.0, Json(fake.profile.1))
}

async fn aggregate(
    State(fake): State<FakeGoogle>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "invalid_token"})));
    }
    fake.aggregate_requests.lock().unwrap().push(body);
    if !fake.aggregate_delay.is_zero() {
        tokio::time::sleep(fake.aggregate_delay).await;
    }
    (fake.aggregate.0, Json(fake.aggregate.1))
}

impl FakeGoogle {
    /// Serve on an ephemeral local port and return the base URL.
    pub async fn spawn(self) -> String {
        let app = Router::new()
            .route("/token", post(token))
            .route("/oauth2/v1/userinfo", get(userinfo))
            .route("/fitness/v1/users/me/dataset:aggregate", post(aggregate))
            .with_state(self);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", addr)
    }
}

/// Create the app with every Google endpoint pointing at `google_base`.
#[allow(dead_code)]
pub fn create_test_app(google_base: &str) -> (Router, Arc<AppState>) {
    let config = Config::test_default().with_google_base(google_base);
    let state = Arc::new(AppState::new(config));
    (create_router(state.clone()), state)
}

/// Create the app against a base nothing listens on.
#[allow(dead_code)]
pub fn create_offline_test_app() -> (Router, Arc<AppState>) {
    create_test_app("http://127.0.0.1:9")
}

/// GET `/` without a cookie and return the issued session id.
#[allow(dead_code)]
pub async fn new_browser_session(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("first visit should set a session cookie")
        .to_str()
        .unwrap();

    set_cookie
        .split(';')
        .next()
        .and_then(|pair| pair.strip_prefix("coach_session="))
        .expect("coach_session cookie")
        .to_string()
}

/// Issue a request carrying the session cookie.
#[allow(dead_code)]
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    session_id: &str,
) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::COOKIE, format!("coach_session={}", session_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

#[allow(dead_code)]
pub async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Poll until `check` passes or two seconds elapse.
#[allow(dead_code)]
pub async fn wait_until(mut check: impl FnMut() -> bool) -> bool {
    for _ in 0..200 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}
