//! Reconnaissance observation records.
//!
//! Mission files are JSON arrays (or a single object) of dropsonde
//! observations. Producers are loose about types: numeric fields arrive as
//! numbers in some files and digit strings in others, and any field may be
//! null. The types here accept both and keep unknown fields so a record can
//! be written back out without losing anything.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use tracing::warn;

use crate::bbox::LatLon;
use crate::error::{ReconError, ReconResult};

/// A scalar that may be a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(Number),
    Text(String),
}

impl FieldValue {
    /// Numeric value, parsing text when needed.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => n.as_f64(),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok(),
        }
        .filter(|v| v.is_finite())
    }

    /// Numeric value read from the leading number of text, so `"1002 hPa"`
    /// reads as 1002.
    pub fn as_leading_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => n.as_f64(),
            FieldValue::Text(s) => leading_float(s),
        }
        .filter(|v| v.is_finite())
    }

    /// Integer value, truncating fractions and reading only the leading
    /// digits of text (`"045deg"` reads as 45).
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
            FieldValue::Text(s) => leading_integer(s),
        }
    }

    /// Text form, as it would be shown in a table cell.
    pub fn as_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Number::from_f64(v)
            .map(FieldValue::Number)
            .unwrap_or_else(|| FieldValue::Text(v.to_string()))
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Number(Number::from(v))
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|v| sign * v)
}

fn leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = match bytes.first() {
        Some(b'+') | Some(b'-') => 1,
        _ => 0,
    };
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - end - 1;
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+') | Some(b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }
    s[..end].parse::<f64>().ok()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Identity, position and time of an observation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BasicInfo {
    #[serde(default)]
    pub storm_name: Option<String>,
    #[serde(default)]
    pub storm_type: Option<String>,
    #[serde(default)]
    pub year: Option<FieldValue>,
    #[serde(default)]
    pub month: Option<FieldValue>,
    #[serde(default)]
    pub day: Option<FieldValue>,
    #[serde(default)]
    pub time: Option<FieldValue>,
    #[serde(default)]
    pub mission_id: Option<FieldValue>,
    #[serde(default)]
    pub observation_id: Option<FieldValue>,
    #[serde(default)]
    pub plane_id: Option<FieldValue>,
    #[serde(default)]
    pub lat: Option<FieldValue>,
    #[serde(default)]
    pub lon: Option<FieldValue>,
    #[serde(default)]
    pub sst_value: Option<FieldValue>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BasicInfo {
    /// Storm name with the first letter uppercase and the rest lowercase.
    pub fn storm_name_normalized(&self) -> Option<String> {
        self.storm_name.as_deref().map(capitalize)
    }
}

/// Capitalize the first character and lowercase the remainder.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
        None => String::new(),
    }
}

/// One sample of the vertical profile.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Level {
    #[serde(default)]
    pub pressure: Option<FieldValue>,
    #[serde(default)]
    pub height: Option<FieldValue>,
    #[serde(default)]
    pub temperature: Option<FieldValue>,
    #[serde(default)]
    pub dewpoint: Option<FieldValue>,
    #[serde(default)]
    pub wind_dir: Option<FieldValue>,
    #[serde(default)]
    pub wind_spd: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latent_heat_flux: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensible_heat_flux: Option<FieldValue>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A temperature-only level.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TempLevel {
    #[serde(default)]
    pub pressure: Option<FieldValue>,
    #[serde(default)]
    pub temperature: Option<FieldValue>,
    #[serde(default)]
    pub dewpoint: Option<FieldValue>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A wind-only level.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WindLevel {
    #[serde(default)]
    pub pressure: Option<FieldValue>,
    #[serde(default)]
    pub wind_dir: Option<FieldValue>,
    #[serde(default)]
    pub wind_spd: Option<FieldValue>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One reconnaissance sample.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Observation {
    #[serde(default)]
    pub basic_info: Option<BasicInfo>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub levels: Vec<Level>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub temp_levels: Vec<TempLevel>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub wind_levels: Vec<WindLevel>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub calculations: BTreeMap<String, Option<f64>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Observation {
    /// Parse a single observation record.
    pub fn from_json(json: &str) -> ReconResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Pretty-printed JSON, as offered for download.
    pub fn to_pretty_json(&self) -> ReconResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The surface (first) level, if any.
    pub fn first_level(&self) -> Option<&Level> {
        self.levels.first()
    }

    /// Map position, when both coordinates are present and numeric.
    pub fn position(&self) -> Option<LatLon> {
        let info = self.basic_info.as_ref()?;
        let lat = info.lat.as_ref()?.as_f64()?;
        let lon = info.lon.as_ref()?.as_f64()?;
        Some(LatLon::from_recon(lat, lon))
    }

    /// A derived calculation value; absent keys and null values are both None.
    pub fn calculation(&self, key: &str) -> Option<f64> {
        self.calculations.get(key).copied().flatten()
    }
}

/// A record that could not be decoded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRecord {
    pub index: usize,
    pub reason: String,
}

/// The decoded contents of one mission file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ObservationSet {
    pub records: Vec<Observation>,
    pub skipped: Vec<SkippedRecord>,
}

impl ObservationSet {
    /// Parse a mission document. A lone object is treated as a one-element
    /// array; records that fail to decode are skipped individually.
    pub fn from_json(json: &str) -> ReconResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> ReconResult<Self> {
        let items = match value {
            Value::Array(items) => items,
            obj @ Value::Object(_) => vec![obj],
            other => {
                return Err(ReconError::InvalidData(format!(
                    "expected an array or object of observations, got {}",
                    json_kind(&other)
                )))
            }
        };

        let mut set = ObservationSet::default();
        for (index, item) in items.into_iter().enumerate() {
            match serde_json::from_value::<Observation>(item) {
                Ok(obs) => set.records.push(obs),
                Err(e) => {
                    warn!(index, error = %e, "Skipping undecodable observation");
                    set.skipped.push(SkippedRecord {
                        index,
                        reason: e.to_string(),
                    });
                }
            }
        }
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
