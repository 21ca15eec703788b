use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// PSI threshold below which a feature is considered stable.
pub const PSI_WARN_THRESHOLD: f64 = 0.10;

/// PSI threshold at which a feature is considered drifted.
pub const PSI_ALERT_THRESHOLD: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Display)]
pub enum Severity {
    #[serde(rename = "OK")]
    #[strum(serialize = "OK")]
    Ok,

    #[serde(rename = "WARN")]
    #[strum(serialize = "WARN")]
    Warn,

    #[serde(rename = "ALERT")]
    #[strum(serialize = "ALERT")]
    Alert,
}

impl Severity {
    /// Classify a PSI value on the OK / WARN / ALERT ladder.
    pub fn from_psi(psi: f64) -> Self {
        if psi < PSI_WARN_THRESHOLD {
            Severity::Ok
        } else if psi < PSI_ALERT_THRESHOLD {
            Severity::Warn
        } else {
            Severity::Alert
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OK" => Ok(Severity::Ok),
            "WARN" => Ok(Severity::Warn),
            "ALERT" => Ok(Severity::Alert),
            other => Err(format!("Unknown severity: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ladder_boundaries() {
        assert_eq!(Severity::from_psi(0.0), Severity::Ok);
        assert_eq!(Severity::from_psi(0.09999), Severity::Ok);
        assert_eq!(Severity::from_psi(0.10), Severity::Warn);
        assert_eq!(Severity::from_psi(0.24999), Severity::Warn);
        assert_eq!(Severity::from_psi(0.25), Severity::Alert);
        assert_eq!(Severity::from_psi(3.0), Severity::Alert);
    }

    #[test]
    fn test_severity_serialized_form() {
        assert_eq!(serde_json::to_string(&Severity::Warn).unwrap(), "\"WARN\"");
        assert_eq!(Severity::Alert.to_string(), "ALERT");
    }
}
