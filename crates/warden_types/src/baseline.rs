use crate::error::TypeError;
use crate::feature::FeatureType;
use chrono::{DateTime, Utc};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Sentinel category absorbing values outside the kept top-k.
pub const OTHER_BUCKET: &str = "__OTHER__";

/// Reference distribution definition for one feature.
///
/// Serialized as a tagged object. Early deployments stored numeric
/// definitions as a bare bin-edge array; that form is still accepted on
/// read.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BaselineDefinition {
    Numeric {
        bin_edges: Vec<f64>,
    },
    Categorical {
        categories: Vec<String>,
        other_bucket: bool,
    },
}

impl BaselineDefinition {
    pub fn feature_type(&self) -> FeatureType {
        match self {
            BaselineDefinition::Numeric { .. } => FeatureType::Numeric,
            BaselineDefinition::Categorical { .. } => FeatureType::Categorical,
        }
    }

    /// Expected length of the probability vector paired with this definition.
    pub fn expected_probs_len(&self) -> usize {
        match self {
            BaselineDefinition::Numeric { bin_edges } => bin_edges.len().saturating_sub(1),
            BaselineDefinition::Categorical { categories, .. } => categories.len(),
        }
    }

    fn from_value(value: Value) -> Result<Self, TypeError> {
        match value {
            // legacy numeric form: plain list of bin edges
            Value::Array(_) => {
                let bin_edges: Vec<f64> = serde_json::from_value(value)?;
                Ok(BaselineDefinition::Numeric { bin_edges })
            }
            Value::Object(ref map) => {
                let tag = map
                    .get("type")
                    .and_then(Value::as_str)
                    .ok_or(TypeError::MalformedDefinition)?;
                match tag {
                    "numeric" => {
                        let bin_edges: Vec<f64> = serde_json::from_value(
                            map.get("bin_edges")
                                .cloned()
                                .ok_or(TypeError::MalformedDefinition)?,
                        )?;
                        Ok(BaselineDefinition::Numeric { bin_edges })
                    }
                    "categorical" => {
                        let categories: Vec<String> = serde_json::from_value(
                            map.get("categories")
                                .cloned()
                                .ok_or(TypeError::MalformedDefinition)?,
                        )?;
                        let other_bucket = map
                            .get("other_bucket")
                            .and_then(Value::as_bool)
                            .unwrap_or(false);
                        Ok(BaselineDefinition::Categorical {
                            categories,
                            other_bucket,
                        })
                    }
                    unknown => Err(TypeError::UnknownDefinitionTag(unknown.to_string())),
                }
            }
            _ => Err(TypeError::MalformedDefinition),
        }
    }
}

impl<'de> Deserialize<'de> for BaselineDefinition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        BaselineDefinition::from_value(value).map_err(D::Error::custom)
    }
}

/// Stored reference distribution for one (project, model, endpoint, feature).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureBaseline {
    pub id: i64,
    pub project_id: String,
    pub model_id: String,
    pub endpoint: String,
    pub feature: String,
    pub feature_type: FeatureType,
    pub n_baseline: i64,
    pub definition: BaselineDefinition,
    pub baseline_probs: Vec<f64>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tagged_numeric_round_trip() {
        let def = BaselineDefinition::Numeric {
            bin_edges: vec![0.0, 0.5, 1.0],
        };
        let value = serde_json::to_value(&def).unwrap();
        assert_eq!(value["type"], "numeric");
        let back: BaselineDefinition = serde_json::from_value(value).unwrap();
        assert_eq!(back, def);
    }

    #[test]
    fn test_tagged_categorical_round_trip() {
        let def = BaselineDefinition::Categorical {
            categories: vec!["CA".into(), "US".into(), OTHER_BUCKET.into()],
            other_bucket: true,
        };
        let back: BaselineDefinition =
            serde_json::from_value(serde_json::to_value(&def).unwrap()).unwrap();
        assert_eq!(back, def);
        assert_eq!(back.expected_probs_len(), 3);
    }

    #[test]
    fn test_legacy_bare_edge_list_is_numeric() {
        let back: BaselineDefinition = serde_json::from_value(json!([0.0, 1.0, 2.0])).unwrap();
        assert_eq!(
            back,
            BaselineDefinition::Numeric {
                bin_edges: vec![0.0, 1.0, 2.0]
            }
        );
        assert_eq!(back.expected_probs_len(), 2);
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        let result: Result<BaselineDefinition, _> =
            serde_json::from_value(json!({"type": "wavelet", "coeffs": []}));
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Unknown baseline definition tag"));
    }

    #[test]
    fn test_scalar_definition_is_rejected() {
        let result: Result<BaselineDefinition, _> = serde_json::from_value(json!(12));
        assert!(result.is_err());
    }
}
