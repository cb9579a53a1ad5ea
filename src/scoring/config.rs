use serde::{Deserialize, Serialize};

/// Scoring options.
///
/// The qualifying threshold gates the award decision; it is configuration,
/// not domain knowledge baked into the engine.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   minimum_qualifying_score: 85
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Total score (0..=100) at or above which a vendor qualifies for award
    /// (default: 85.0)
    #[serde(default)]
    pub minimum_qualifying_score: Option<f64>,
}

impl ScoringConfig {
    pub fn threshold(&self) -> f64 {
        self.minimum_qualifying_score.unwrap_or(85.0)
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            minimum_qualifying_score: Some(85.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_threshold() {
        assert_eq!(ScoringConfig::default().threshold(), 85.0);
    }

    #[test]
    fn test_missing_value_falls_back_to_default() {
        let config = ScoringConfig {
            minimum_qualifying_score: None,
        };
        assert_eq!(config.threshold(), 85.0);
    }

    #[test]
    fn test_scoring_config_serde_roundtrip() {
        let config = ScoringConfig {
            minimum_qualifying_score: Some(70.0),
        };
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: ScoringConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_empty_scoring_config_parse() {
        let config: ScoringConfig = serde_saphyr::from_str("{}").unwrap();
        assert!(config.minimum_qualifying_score.is_none());
        assert_eq!(config.threshold(), 85.0);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<ScoringConfig, _> =
            serde_saphyr::from_str("minimum_qualifiyng_score: 85");
        assert!(result.is_err());
    }
}
