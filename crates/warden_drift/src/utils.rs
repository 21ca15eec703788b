use std::collections::{BTreeMap, BTreeSet, HashMap};
use warden_types::feature::FeatureValue;
use warden_types::record::{Event, FeaturePsi};

/// Numeric and categorical observations of one feature across events.
#[derive(Debug, Default)]
pub struct FeatureSample {
    pub numeric: Vec<f64>,
    pub categorical: Vec<String>,
}

/// Collect observations of a single feature, discarding unusable values.
pub fn collect_feature_sample(events: &[Event], feature: &str) -> FeatureSample {
    let mut sample = FeatureSample::default();
    for event in events {
        if let Some(value) = event.features.get(feature) {
            match FeatureValue::from_json(value) {
                Some(FeatureValue::Numeric(v)) => sample.numeric.push(v),
                Some(FeatureValue::Categorical(v)) => sample.categorical.push(v),
                None => {}
            }
        }
    }
    sample
}

/// One scan over a day's events: per-feature numeric and categorical value
/// lists, plus the set of feature names observed at all.
#[derive(Debug, Default)]
pub struct DaySamples {
    pub numeric: HashMap<String, Vec<f64>>,
    pub categorical: HashMap<String, Vec<String>>,
    pub observed: BTreeSet<String>,
}

pub fn collect_day_samples(events: &[Event]) -> DaySamples {
    let mut samples = DaySamples::default();
    for event in events {
        for (name, value) in &event.features {
            samples.observed.insert(name.clone());
            match FeatureValue::from_json(value) {
                Some(FeatureValue::Numeric(v)) => {
                    samples.numeric.entry(name.clone()).or_default().push(v)
                }
                Some(FeatureValue::Categorical(v)) => {
                    samples.categorical.entry(name.clone()).or_default().push(v)
                }
                None => {}
            }
        }
    }
    samples
}

/// Worst offender over a psi map. Order-insensitive: depends only on the
/// final set of computed values.
pub fn max_psi_entry(psi: &BTreeMap<String, FeaturePsi>) -> (Option<String>, Option<f64>) {
    let mut max: Option<(&str, f64)> = None;
    for (feature, entry) in psi {
        match max {
            Some((_, value)) if entry.psi <= value => {}
            _ => max = Some((feature, entry.psi)),
        }
    }
    (
        max.map(|(feature, _)| feature.to_string()),
        max.map(|(_, value)| value),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_types::feature::FeatureType;
    use warden_types::severity::Severity;

    fn entry(psi: f64) -> FeaturePsi {
        FeaturePsi {
            psi,
            n: 100,
            feature_type: FeatureType::Numeric,
            severity: Severity::from_psi(psi),
            categories: None,
        }
    }

    #[test]
    fn test_max_psi_entry() {
        let mut psi = BTreeMap::new();
        psi.insert("age".to_string(), entry(0.05));
        psi.insert("balance".to_string(), entry(0.31));
        psi.insert("tenure".to_string(), entry(0.12));

        let (feature, value) = max_psi_entry(&psi);
        assert_eq!(feature.as_deref(), Some("balance"));
        assert_eq!(value, Some(0.31));
    }

    #[test]
    fn test_max_psi_entry_empty_map() {
        let psi = BTreeMap::new();
        assert_eq!(max_psi_entry(&psi), (None, None));
    }
}
