//! Raw metric values and their wire representation.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Classification of one raw metric value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawValue {
    /// Finite number, usable as-is
    Finite(f64),
    /// NaN or ±∞
    NonFinite(f64),
    /// Absent or null
    Missing,
}

impl RawValue {
    #[must_use]
    pub fn from_option(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => Self::Finite(v),
            Some(v) => Self::NonFinite(v),
            None => Self::Missing,
        }
    }

    /// The value if it is finite
    #[must_use]
    pub const fn finite(&self) -> Option<f64> {
        match self {
            Self::Finite(v) => Some(*v),
            _ => None,
        }
    }

    /// Whether the value can be used without imputation
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Finite(_))
    }

    /// Whether the value takes part in rank ordering (anything but NaN/missing)
    #[must_use]
    pub fn rankable(&self) -> Option<f64> {
        match self {
            Self::Finite(v) => Some(*v),
            Self::NonFinite(v) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }

    /// Short description for trace notes
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Finite(v) => format!("{v}"),
            Self::NonFinite(v) if v.is_nan() => "NaN".to_string(),
            Self::NonFinite(v) if v.is_sign_positive() => "+inf".to_string(),
            Self::NonFinite(_) => "-inf".to_string(),
            Self::Missing => "missing".to_string(),
        }
    }
}

/// Traces carry raw values verbatim: finite numbers as JSON numbers,
/// non-finite ones as their string sentinel, missing as `null`.
impl Serialize for RawValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Finite(v) => serializer.serialize_f64(*v),
            Self::NonFinite(v) => serializer.serialize_str(sentinel(*v)),
            Self::Missing => serializer.serialize_none(),
        }
    }
}

fn sentinel(v: f64) -> &'static str {
    if v.is_nan() {
        "NaN"
    } else if v.is_sign_positive() {
        "Infinity"
    } else {
        "-Infinity"
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireValue {
    Number(f64),
    Text(String),
}

/// Parse a textual cell. Recognized sentinels map to non-finite values,
/// numeric text is parsed, anything else counts as missing.
fn parse_text(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "" | "null" | "n/a" | "na" | "-" => None,
        "nan" => Some(f64::NAN),
        "infinity" | "+infinity" | "inf" | "+inf" => Some(f64::INFINITY),
        "-infinity" | "-inf" => Some(f64::NEG_INFINITY),
        _ => trimmed.replace(',', "").parse::<f64>().ok(),
    }
}

/// Serde adapter for the entity metric map.
///
/// JSON has no non-finite numbers, so NaN and ±∞ travel as the strings
/// `"NaN"`, `"Infinity"` and `"-Infinity"`.
pub(super) mod metric_map {
    use super::*;

    pub fn serialize<S: Serializer>(
        map: &IndexMap<String, Option<f64>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        #[serde(untagged)]
        enum Out<'a> {
            Number(f64),
            Text(&'a str),
            Null(Option<()>),
        }

        let wire: IndexMap<&str, Out<'_>> = map
            .iter()
            .map(|(k, v)| {
                let out = match v {
                    Some(x) if x.is_finite() => Out::Number(*x),
                    Some(x) => Out::Text(sentinel(*x)),
                    None => Out::Null(None),
                };
                (k.as_str(), out)
            })
            .collect();
        wire.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<IndexMap<String, Option<f64>>, D::Error> {
        let wire: IndexMap<String, Option<WireValue>> = IndexMap::deserialize(deserializer)?;
        Ok(wire
            .into_iter()
            .map(|(k, v)| {
                let value = match v {
                    Some(WireValue::Number(n)) => Some(n),
                    Some(WireValue::Text(t)) => parse_text(&t),
                    None => None,
                };
                (k, value)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert_eq!(RawValue::from_option(Some(1.5)), RawValue::Finite(1.5));
        assert!(matches!(
            RawValue::from_option(Some(f64::INFINITY)),
            RawValue::NonFinite(_)
        ));
        assert!(matches!(RawValue::from_option(Some(f64::NAN)), RawValue::NonFinite(_)));
        assert_eq!(RawValue::from_option(None), RawValue::Missing);
    }

    #[test]
    fn test_rankable_excludes_nan_only() {
        assert_eq!(RawValue::Finite(2.0).rankable(), Some(2.0));
        assert_eq!(
            RawValue::NonFinite(f64::NEG_INFINITY).rankable(),
            Some(f64::NEG_INFINITY)
        );
        assert_eq!(RawValue::NonFinite(f64::NAN).rankable(), None);
        assert_eq!(RawValue::Missing.rankable(), None);
        assert!(!RawValue::NonFinite(f64::INFINITY).is_valid());
    }

    #[test]
    fn test_parse_text_cells() {
        assert_eq!(parse_text("1,250.5"), Some(1250.5));
        assert_eq!(parse_text("Infinity"), Some(f64::INFINITY));
        assert_eq!(parse_text("-inf"), Some(f64::NEG_INFINITY));
        assert!(parse_text("NaN").is_some_and(f64::is_nan));
        assert_eq!(parse_text("n/a"), None);
        assert_eq!(parse_text("not a number"), None);
    }

    #[test]
    fn test_serialize_sentinels() {
        let out = serde_json::to_string(&vec![
            RawValue::Finite(2.5),
            RawValue::NonFinite(f64::NEG_INFINITY),
            RawValue::Missing,
        ])
        .unwrap();
        assert_eq!(out, r#"[2.5,"-Infinity",null]"#);
    }

    #[test]
    fn test_describe() {
        assert_eq!(RawValue::Missing.describe(), "missing");
        assert_eq!(RawValue::NonFinite(f64::INFINITY).describe(), "+inf");
        assert_eq!(RawValue::NonFinite(f64::NAN).describe(), "NaN");
    }
}
