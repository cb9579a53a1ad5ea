use std::collections::HashSet;

use super::config::ScoringConfig;
use crate::model::Template;

/// Validate the evaluation template at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_template(template: &Template) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    let mut category_ids = HashSet::new();
    let mut criterion_ids = HashSet::new();

    for (ci, category) in template.categories.iter().enumerate() {
        if category.id.trim().is_empty() {
            errors.push(format!("template.categories[{}].id: must not be empty", ci));
        } else if !category_ids.insert(category.id.clone()) {
            errors.push(format!(
                "template.categories[{}].id: duplicate id '{}'",
                ci, category.id
            ));
        }

        if !weight_in_range(category.weight) {
            errors.push(format!(
                "template.categories[{}].weight: must be within 0..=1 (got {})",
                ci, category.weight
            ));
        }

        for (ki, criterion) in category.criteria.iter().enumerate() {
            let path = format!("template.categories[{}].criteria[{}]", ci, ki);

            if criterion.id.trim().is_empty() {
                errors.push(format!("{}.id: must not be empty", path));
            } else if !criterion_ids.insert(criterion.id.clone()) {
                // Criterion ids key the score sheets, so they are unique
                // across the whole template, not per category.
                errors.push(format!("{}.id: duplicate id '{}'", path, criterion.id));
            }

            if !weight_in_range(criterion.weight) {
                errors.push(format!(
                    "{}.weight: must be within 0..=1 (got {})",
                    path, criterion.weight
                ));
            }

            if !(criterion.max_score.is_finite() && criterion.max_score > 0.0) {
                errors.push(format!(
                    "{}.max_score: must be a positive number (got {})",
                    path, criterion.max_score
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate scoring options at startup.
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(threshold) = config.minimum_qualifying_score {
        if !(threshold.is_finite() && (0.0..=100.0).contains(&threshold)) {
            errors.push(format!(
                "scoring.minimum_qualifying_score: must be within 0..=100 (got {})",
                threshold
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn weight_in_range(weight: f64) -> bool {
    weight.is_finite() && (0.0..=1.0).contains(&weight)
}
