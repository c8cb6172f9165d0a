//! Synthetic mission generators for tests.

use serde_json::Value;

use crate::fixtures::observation_json;

/// A mission of `count` observations along a straight track, with wind
/// speed increasing by 10 kt per observation from `start_wind_kt`.
pub fn mission_track(storm: &str, mission: &str, count: usize, start_wind_kt: i64) -> Value {
    let records: Vec<Value> = (0..count)
        .map(|i| {
            observation_json(
                storm,
                mission,
                &format!("{:02}", i + 1),
                20.0 + i as f64,
                90.0 + i as f64 * 0.5,
                start_wind_kt + 10 * i as i64,
                1000.0 - 5.0 * i as f64,
            )
        })
        .collect();
    Value::Array(records)
}
