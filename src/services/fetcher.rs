// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Post-login data fetch: profile plus a month of daily weights.
//!
//! The two requests run concurrently and each writes its own field of the
//! view state when it completes. Neither waits on the other and neither
//! rolls back the other on failure. Failures are logged and leave the
//! corresponding field untouched.

use crate::error::GoogleError;
use crate::models::weight::Bucket;
use crate::models::{AggregateRequest, AggregateResponse, WeightSample};
use crate::services::GoogleClient;
use crate::AppState;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// "One month" as a fixed span (30.44 days), not calendar aware.
pub const ONE_MONTH_MILLIS: i64 = 2_629_743_000;
pub const ONE_DAY_MILLIS: i64 = 86_400_000;

/// Aggregate query for the month ending at `now_millis`.
pub fn weight_query(now_millis: i64) -> AggregateRequest {
    AggregateRequest::daily_weight(now_millis - ONE_MONTH_MILLIS, now_millis, ONE_DAY_MILLIS)
}

/// Flatten an aggregate response into one sample per non-empty bucket.
///
/// Only the first point of the first dataset in each bucket counts. Bucket
/// order is preserved. A qualifying point without a float value or with an
/// unparseable start time fails the whole response.
pub fn normalize_weight_buckets(
    response: &AggregateResponse,
) -> Result<Vec<WeightSample>, GoogleError> {
    let mut samples = Vec::with_capacity(response.bucket.len());

    for (index, bucket) in response.bucket.iter().enumerate() {
        if let Some(sample) = first_sample(index, bucket)? {
            samples.push(sample);
        }
    }

    Ok(samples)
}

fn first_sample(index: usize, bucket: &Bucket) -> Result<Option<WeightSample>, GoogleError> {
    let Some(point) = bucket.dataset.first().and_then(|d| d.point.first()) else {
        return Ok(None);
    };

    let weight = point
        .value
        .first()
        .and_then(|v| v.fp_val)
        .ok_or_else(|| GoogleError::Malformed(format!("bucket {}: point has no fpVal", index)))?;

    let date = point.start_time_nanos.to_micros().ok_or_else(|| {
        GoogleError::Malformed(format!("bucket {}: bad startTimeNanos", index))
    })?;

    Ok(Some(WeightSample { weight, date }))
}

/// Query and normalize the month of weights ending at `now_millis`.
pub async fn load_weight_samples(
    google: &GoogleClient,
    access_token: &str,
    now_millis: i64,
) -> Result<Vec<WeightSample>, GoogleError> {
    let response = google
        .aggregate(access_token, &weight_query(now_millis))
        .await?;
    normalize_weight_buckets(&response)
}

/// Run both fetches for `session_id` and write results as they land.
///
/// Writes are not guarded against a logout that happens while a request is
/// in flight: a late response still lands in the (now signed-out) state.
pub async fn fetch_dashboard(state: &AppState, session_id: &str, access_token: &str) {
    let now_millis = chrono::Utc::now().timestamp_millis();

    let profile = async {
        match state.google.get_profile(access_token).await {
            Ok(profile) => {
                tracing::debug!("Profile fetched");
                state
                    .sessions
                    .update(session_id, |view| view.set_profile(profile));
            }
            Err(e) => tracing::error!(error = %e, "Profile fetch failed"),
        }
    };

    let weights = async {
        match load_weight_samples(&state.google, access_token, now_millis).await {
            Ok(samples) => {
                tracing::debug!(count = samples.len(), "Weight samples fetched");
                state
                    .sessions
                    .update(session_id, |view| view.set_weight_samples(samples));
            }
            Err(e) => tracing::error!(error = %e, "Weight fetch failed"),
        }
    };

    tokio::join!(profile, weights);
}

/// Start a background fetch if `session_id` has a token not yet fetched for.
pub fn spawn_fetch(state: Arc<AppState>, session_id: String) -> Option<JoinHandle<()>> {
    let access_token = state.sessions.begin_fetch(&session_id)?;

    tracing::info!("Signed in, fetching profile and weight data");
    Some(tokio::spawn(async move {
        fetch_dashboard(&state, &session_id, &access_token).await;
    }))
}
