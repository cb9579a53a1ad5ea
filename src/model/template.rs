use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::error::MatrixError;

/// Evaluation priority attached to a criterion. Display metadata only; the
/// scoring math uses weights, not priorities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn label(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

fn default_max_score() -> f64 {
    5.0
}

fn default_priority() -> Priority {
    Priority::Medium
}

/// A single scored question within a category.
///
/// `weight` is a fraction of the parent category; sibling weights
/// conventionally sum to 1.0 but the engine renormalizes by the weight it has
/// actually seen, so partial sheets stay comparable.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Criterion {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub weight: f64,
    /// Raw scores are entered on a 0..=max_score scale (default 5)
    #[serde(default = "default_max_score")]
    pub max_score: f64,
    #[serde(default = "default_priority")]
    pub priority: Priority,
}

/// A weighted group of criteria (e.g. "Technical capability").
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub weight: f64,
    #[serde(default)]
    pub criteria: Vec<Criterion>,
}

/// The evaluation matrix: an ordered tree of weighted categories and
/// criteria, authored once per RFP and edited via add/remove operations.
///
/// Example YAML (as stored in the config file):
/// ```yaml
/// name: "Cloud hosting RFP"
/// categories:
///   - id: technical
///     name: Technical capability
///     weight: 0.4
///     criteria:
///       - id: architecture-fit
///         name: Architecture fit
///         weight: 0.6
///         max_score: 5
///         priority: high
///       - id: scalability
///         name: Scalability
///         weight: 0.4
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Template {
    pub name: String,
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl Template {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            categories: Vec::new(),
        }
    }

    /// Look up a category by id.
    pub fn category(&self, id: &str) -> Result<&Category, MatrixError> {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| MatrixError::CategoryNotFound { id: id.to_string() })
    }

    /// Look up a criterion by id across all categories.
    pub fn criterion(&self, id: &str) -> Result<&Criterion, MatrixError> {
        self.criteria()
            .find(|c| c.id == id)
            .ok_or_else(|| MatrixError::CriterionNotFound { id: id.to_string() })
    }

    /// Iterate every criterion in template order.
    pub fn criteria(&self) -> impl Iterator<Item = &Criterion> {
        self.categories.iter().flat_map(|c| c.criteria.iter())
    }

    pub fn criteria_count(&self) -> usize {
        self.categories.iter().map(|c| c.criteria.len()).sum()
    }

    /// Add a category. Rejects empty or duplicate ids and out-of-range
    /// weights; anything this accepts also passes startup validation.
    pub fn add_category(&mut self, category: Category) -> Result<(), MatrixError> {
        if category.id.trim().is_empty() {
            return Err(MatrixError::EmptyId { name: category.name });
        }
        if self.categories.iter().any(|c| c.id == category.id) {
            return Err(MatrixError::DuplicateId { id: category.id });
        }
        if !(0.0..=1.0).contains(&category.weight) {
            return Err(MatrixError::InvalidWeight {
                id: category.id,
                value: category.weight,
            });
        }
        self.categories.push(category);
        Ok(())
    }

    /// Remove a category and all of its criteria. Returns the removed
    /// category so callers can report what was dropped.
    pub fn remove_category(&mut self, id: &str) -> Result<Category, MatrixError> {
        let pos = self
            .categories
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| MatrixError::CategoryNotFound { id: id.to_string() })?;
        Ok(self.categories.remove(pos))
    }

    /// Add a criterion to an existing category. Criterion ids are unique
    /// across the whole template since score sheets are keyed by them.
    /// Anything this accepts also passes startup validation.
    pub fn add_criterion(
        &mut self,
        category_id: &str,
        criterion: Criterion,
    ) -> Result<(), MatrixError> {
        if criterion.id.trim().is_empty() {
            return Err(MatrixError::EmptyId {
                name: criterion.name,
            });
        }
        if self.criteria().any(|c| c.id == criterion.id) {
            return Err(MatrixError::DuplicateId { id: criterion.id });
        }
        if !(0.0..=1.0).contains(&criterion.weight) {
            return Err(MatrixError::InvalidWeight {
                id: criterion.id,
                value: criterion.weight,
            });
        }
        if !(criterion.max_score.is_finite() && criterion.max_score > 0.0) {
            return Err(MatrixError::InvalidMaxScore {
                id: criterion.id,
                value: criterion.max_score,
            });
        }
        let category = self
            .categories
            .iter_mut()
            .find(|c| c.id == category_id)
            .ok_or_else(|| MatrixError::CategoryNotFound {
                id: category_id.to_string(),
            })?;
        category.criteria.push(criterion);
        Ok(())
    }

    /// Remove a criterion by id from whichever category holds it.
    pub fn remove_criterion(&mut self, id: &str) -> Result<Criterion, MatrixError> {
        for category in &mut self.categories {
            if let Some(pos) = category.criteria.iter().position(|c| c.id == id) {
                return Ok(category.criteria.remove(pos));
            }
        }
        Err(MatrixError::CriterionNotFound { id: id.to_string() })
    }

    /// Built-in starter template used by `init` when the user skips the
    /// custom wizard.
    pub fn sample() -> Self {
        let criterion = |id: &str, name: &str, weight: f64, priority: Priority| Criterion {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            weight,
            max_score: default_max_score(),
            priority,
        };

        Self {
            name: "Vendor RFP evaluation".to_string(),
            categories: vec![
                Category {
                    id: "technical".to_string(),
                    name: "Technical capability".to_string(),
                    weight: 0.35,
                    criteria: vec![
                        criterion("architecture-fit", "Architecture fit", 0.4, Priority::High),
                        criterion("scalability", "Scalability", 0.3, Priority::Medium),
                        criterion("security-posture", "Security posture", 0.3, Priority::High),
                    ],
                },
                Category {
                    id: "commercial".to_string(),
                    name: "Commercial terms".to_string(),
                    weight: 0.25,
                    criteria: vec![
                        criterion("pricing", "Pricing competitiveness", 0.6, Priority::High),
                        criterion("contract-flexibility", "Contract flexibility", 0.4, Priority::Medium),
                    ],
                },
                Category {
                    id: "delivery".to_string(),
                    name: "Delivery and support".to_string(),
                    weight: 0.2,
                    criteria: vec![
                        criterion("implementation-plan", "Implementation plan", 0.5, Priority::Medium),
                        criterion("support-model", "Support model", 0.5, Priority::Medium),
                    ],
                },
                Category {
                    id: "compliance".to_string(),
                    name: "Compliance and risk".to_string(),
                    weight: 0.2,
                    criteria: vec![
                        criterion("regulatory-compliance", "Regulatory compliance", 0.5, Priority::High),
                        criterion("financial-stability", "Financial stability", 0.5, Priority::Low),
                    ],
                },
            ],
        }
    }
}

/// Derive a stable id from a display name: lowercase, alphanumerics kept,
/// everything else collapsed to single dashes.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;
    for c in name.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_criterion(id: &str, weight: f64) -> Criterion {
        Criterion {
            id: id.to_string(),
            name: id.to_string(),
            description: None,
            weight,
            max_score: 5.0,
            priority: Priority::Medium,
        }
    }

    #[test]
    fn test_add_and_lookup_category() {
        let mut template = Template::new("Test");
        template
            .add_category(Category {
                id: "tech".to_string(),
                name: "Technical".to_string(),
                weight: 0.5,
                criteria: vec![],
            })
            .unwrap();
        assert_eq!(template.category("tech").unwrap().name, "Technical");
    }

    #[test]
    fn test_category_not_found() {
        let template = Template::new("Test");
        let err = template.category("missing").unwrap_err();
        assert_eq!(
            err,
            MatrixError::CategoryNotFound {
                id: "missing".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_category_rejected() {
        let mut template = Template::new("Test");
        let cat = Category {
            id: "tech".to_string(),
            name: "Technical".to_string(),
            weight: 0.5,
            criteria: vec![],
        };
        template.add_category(cat.clone()).unwrap();
        let err = template.add_category(cat).unwrap_err();
        assert_eq!(
            err,
            MatrixError::DuplicateId {
                id: "tech".to_string()
            }
        );
    }

    #[test]
    fn test_category_weight_out_of_range() {
        let mut template = Template::new("Test");
        let err = template
            .add_category(Category {
                id: "tech".to_string(),
                name: "Technical".to_string(),
                weight: 1.5,
                criteria: vec![],
            })
            .unwrap_err();
        assert!(matches!(err, MatrixError::InvalidWeight { .. }));
    }

    #[test]
    fn test_add_criterion_to_missing_category() {
        let mut template = Template::new("Test");
        let err = template
            .add_criterion("missing", simple_criterion("c1", 0.5))
            .unwrap_err();
        assert!(matches!(err, MatrixError::CategoryNotFound { .. }));
    }

    #[test]
    fn test_criterion_ids_unique_across_categories() {
        let mut template = Template::new("Test");
        for id in ["a", "b"] {
            template
                .add_category(Category {
                    id: id.to_string(),
                    name: id.to_string(),
                    weight: 0.5,
                    criteria: vec![],
                })
                .unwrap();
        }
        template
            .add_criterion("a", simple_criterion("shared", 0.5))
            .unwrap();
        let err = template
            .add_criterion("b", simple_criterion("shared", 0.5))
            .unwrap_err();
        assert!(matches!(err, MatrixError::DuplicateId { .. }));
    }

    #[test]
    fn test_add_criterion_rejects_invalid_max_score() {
        // The edit seam must not accept a criterion the startup gate would
        // reject, or every later invocation dies on config validation.
        let mut template = Template::sample();
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let mut criterion = simple_criterion("latency-slo", 0.5);
            criterion.max_score = bad;
            let err = template.add_criterion("technical", criterion).unwrap_err();
            assert!(matches!(err, MatrixError::InvalidMaxScore { .. }));
        }
        assert!(crate::scoring::validate_template(&template).is_ok());
    }

    #[test]
    fn test_add_category_rejects_empty_id() {
        let mut template = Template::new("Test");
        let err = template
            .add_category(Category {
                id: slugify("!!!"),
                name: "!!!".to_string(),
                weight: 0.5,
                criteria: vec![],
            })
            .unwrap_err();
        assert!(matches!(err, MatrixError::EmptyId { .. }));
        assert!(crate::scoring::validate_template(&template).is_ok());
    }

    #[test]
    fn test_add_criterion_rejects_empty_id() {
        let mut template = Template::sample();
        let mut criterion = simple_criterion("", 0.5);
        criterion.name = "???".to_string();
        let err = template.add_criterion("technical", criterion).unwrap_err();
        assert!(matches!(err, MatrixError::EmptyId { .. }));
        assert!(crate::scoring::validate_template(&template).is_ok());
    }

    #[test]
    fn test_remove_criterion_searches_all_categories() {
        let mut template = Template::sample();
        let removed = template.remove_criterion("support-model").unwrap();
        assert_eq!(removed.name, "Support model");
        assert!(template.criterion("support-model").is_err());
    }

    #[test]
    fn test_remove_criterion_missing() {
        let mut template = Template::sample();
        assert!(matches!(
            template.remove_criterion("nope"),
            Err(MatrixError::CriterionNotFound { .. })
        ));
    }

    #[test]
    fn test_criteria_count() {
        let template = Template::sample();
        assert_eq!(template.criteria_count(), 9);
    }

    #[test]
    fn test_max_score_defaults_to_five() {
        let yaml = r#"
id: pricing
name: Pricing
weight: 0.5
"#;
        let criterion: Criterion = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(criterion.max_score, 5.0);
        assert_eq!(criterion.priority, Priority::Medium);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Acme Corp"), "acme-corp");
        assert_eq!(slugify("  Globex / Initech  "), "globex-initech");
        assert_eq!(slugify("Already-slugged"), "already-slugged");
    }

    #[test]
    fn test_template_yaml_roundtrip() {
        let template = Template::sample();
        let yaml = serde_saphyr::to_string(&template).unwrap();
        let parsed: Template = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(template, parsed);
    }
}
