use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum FeatureType {
    #[strum(serialize = "numeric")]
    Numeric,

    #[strum(serialize = "categorical")]
    Categorical,
}

impl std::str::FromStr for FeatureType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "numeric" => Ok(FeatureType::Numeric),
            "categorical" => Ok(FeatureType::Categorical),
            other => Err(format!("Unknown feature type: {other}")),
        }
    }
}

/// A single usable observation extracted from an event's feature map.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    Numeric(f64),
    Categorical(String),
}

impl FeatureValue {
    /// Classify a raw JSON feature value. Booleans are never numeric; nulls,
    /// arrays and objects are unusable.
    pub fn from_json(value: &Value) -> Option<FeatureValue> {
        match value {
            Value::Bool(_) => None,
            Value::Number(n) => n.as_f64().map(FeatureValue::Numeric),
            Value::String(s) => Some(FeatureValue::Categorical(s.clone())),
            _ => None,
        }
    }

    pub fn as_numeric(&self) -> Option<f64> {
        match self {
            FeatureValue::Numeric(v) => Some(*v),
            FeatureValue::Categorical(_) => None,
        }
    }

    pub fn as_categorical(&self) -> Option<&str> {
        match self {
            FeatureValue::Numeric(_) => None,
            FeatureValue::Categorical(v) => Some(v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numbers_classify_as_numeric() {
        assert_eq!(
            FeatureValue::from_json(&json!(1.5)),
            Some(FeatureValue::Numeric(1.5))
        );
        assert_eq!(
            FeatureValue::from_json(&json!(3)),
            Some(FeatureValue::Numeric(3.0))
        );
    }

    #[test]
    fn test_booleans_are_not_numeric() {
        assert_eq!(FeatureValue::from_json(&json!(true)), None);
        assert_eq!(FeatureValue::from_json(&json!(false)), None);
    }

    #[test]
    fn test_strings_classify_as_categorical() {
        assert_eq!(
            FeatureValue::from_json(&json!("CA")),
            Some(FeatureValue::Categorical("CA".to_string()))
        );
    }

    #[test]
    fn test_unusable_values_are_dropped() {
        assert_eq!(FeatureValue::from_json(&json!(null)), None);
        assert_eq!(FeatureValue::from_json(&json!([1, 2])), None);
        assert_eq!(FeatureValue::from_json(&json!({"a": 1})), None);
    }
}
