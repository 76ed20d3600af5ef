//! Weight samples and the Google Fitness aggregate wire format.

use serde::{Deserialize, Serialize};

pub const WEIGHT_DATA_TYPE: &str = "com.google.weight.summary";
pub const WEIGHT_DATA_SOURCE: &str = "derived:com.google.weight:com.google.android.gms:merge_weight";

/// One day's weight reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightSample {
    /// Weight as reported by Google Fit (kilograms)
    pub weight: f64,
    /// Start of the reading in epoch microseconds
    pub date: i64,
}

// ─── Request ─────────────────────────────────────────────────

/// Body of `POST /fitness/v1/users/me/dataset:aggregate`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateRequest {
    pub aggregate_by: Vec<AggregateBy>,
    pub bucket_by_time: BucketByTime,
    pub start_time_millis: i64,
    pub end_time_millis: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateBy {
    pub data_type_name: String,
    pub data_source_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketByTime {
    pub duration_millis: i64,
}

impl AggregateRequest {
    /// Daily merged weight summaries over `[start_millis, end_millis]`.
    pub fn daily_weight(start_millis: i64, end_millis: i64, bucket_millis: i64) -> Self {
        Self {
            aggregate_by: vec![AggregateBy {
                data_type_name: WEIGHT_DATA_TYPE.to_string(),
                data_source_id: WEIGHT_DATA_SOURCE.to_string(),
            }],
            bucket_by_time: BucketByTime {
                duration_millis: bucket_millis,
            },
            start_time_millis: start_millis,
            end_time_millis: end_millis,
        }
    }
}

// ─── Response ────────────────────────────────────────────────

/// Aggregate response: one bucket per day, oldest first.
#[derive(Debug, Clone, Deserialize)]
pub struct AggregateResponse {
    pub bucket: Vec<Bucket>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Bucket {
    #[serde(default)]
    pub dataset: Vec<Dataset>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub point: Vec<DataPoint>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPoint {
    #[serde(default)]
    pub value: Vec<DataValue>,
    pub start_time_nanos: Nanos,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataValue {
    #[serde(default)]
    pub fp_val: Option<f64>,
}

/// Google encodes int64 fields as JSON strings, but numbers show up too,
/// including floats like `1.7e18` and values past `i64::MAX`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Nanos {
    Number(i64),
    Unsigned(u64),
    Float(f64),
    Text(String),
}

impl Nanos {
    /// Whole microseconds (`nanos / 1000`, truncated toward zero).
    pub fn to_micros(&self) -> Option<i64> {
        match self {
            Nanos::Number(n) => Some(n / 1000),
            Nanos::Unsigned(n) => i64::try_from(n / 1000).ok(),
            Nanos::Float(f) => {
                let micros = (f / 1000.0).trunc();
                // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
                (micros.is_finite() && micros >= i64::MIN as f64 && micros < i64::MAX as f64)
                    .then_some(micros as i64)
            }
            Nanos::Text(s) => {
                let n: i128 = s.trim().parse().ok()?;
                i64::try_from(n / 1000).ok()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = AggregateRequest::daily_weight(1_000, 2_000, 86_400_000);
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "aggregateBy": [{
                    "dataTypeName": "com.google.weight.summary",
                    "dataSourceId": "derived:com.google.weight:com.google.android.gms:merge_weight"
                }],
                "bucketByTime": { "durationMillis": 86400000 },
                "startTimeMillis": 1000,
                "endTimeMillis": 2000
            })
        );
    }

    fn micros(json: &str) -> Option<i64> {
        let point: DataPoint = serde_json::from_str(json).unwrap();
        point.start_time_nanos.to_micros()
    }

    #[test]
    fn test_nanos_accepts_string_and_number() {
        assert_eq!(
            micros(r#"{"startTimeNanos": "1700000000000000000", "value": []}"#),
            Some(1_700_000_000_000_000)
        );

        let point: DataPoint =
            serde_json::from_str(r#"{"startTimeNanos": 1700000000000000000}"#).unwrap();
        assert_eq!(point.start_time_nanos.to_micros(), Some(1_700_000_000_000_000));
        assert!(point.value.is_empty());

        assert_eq!(micros(r#"{"startTimeNanos": 1999}"#), Some(1));
        assert_eq!(micros(r#"{"startTimeNanos": "soon", "value": []}"#), None);
    }

    #[test]
    fn test_nanos_float_and_unsigned() {
        assert_eq!(
            micros(r#"{"startTimeNanos": 1.7e18}"#),
            Some(1_700_000_000_000_000)
        );
        assert_eq!(micros(r#"{"startTimeNanos": 2500.9}"#), Some(2));

        // Above i64::MAX nanos, still a representable microsecond count
        assert_eq!(
            micros(r#"{"startTimeNanos": 18446744073709551615}"#),
            Some(18_446_744_073_709_551)
        );
        assert_eq!(
            micros(r#"{"startTimeNanos": "18446744073709551615"}"#),
            Some(18_446_744_073_709_551)
        );

        assert_eq!(micros(r#"{"startTimeNanos": 1e300}"#), None);
    }

    #[test]
    fn test_bucket_without_dataset() {
        let resp: AggregateResponse = serde_json::from_str(
            r#"{"bucket": [{"startTimeMillis": "1", "endTimeMillis": "2"}]}"#,
        )
        .unwrap();
        assert_eq!(resp.bucket.len(), 1);
        assert!(resp.bucket[0].dataset.is_empty());
    }
}
