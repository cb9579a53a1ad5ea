use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{Category, Template};

/// Sparse raw scores for one vendor, keyed by criterion id. An absent entry
/// means "not yet evaluated", which is not the same as a score of 0.
pub type ScoreSheet = HashMap<String, f64>;

/// Award decision for a vendor's total score against the qualifying
/// threshold. Gates the award action in the board output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum AwardDecision {
    Qualified,
    NotQualified,
}

impl AwardDecision {
    pub fn is_qualified(&self) -> bool {
        matches!(self, AwardDecision::Qualified)
    }
}

/// Derived per-category score for display. Recomputed on every run, never
/// stored.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CategoryScore {
    pub id: String,
    pub name: String,
    pub weight: f64,
    /// 0..=100, and exactly 0 (not NaN) when nothing in the category is
    /// scored yet
    pub percentage: f64,
    pub scored_criteria: usize,
    pub total_criteria: usize,
}

/// Full derived result for one vendor.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScoreResult {
    pub vendor_id: String,
    pub categories: Vec<CategoryScore>,
    /// None when no criterion across the whole template has been scored;
    /// an unevaluated vendor is undefined, not 0%.
    pub total: Option<f64>,
}

/// Percentage score for one category over a sparse sheet.
///
/// Each scored criterion contributes `(raw / max_score) * weight`; the sum is
/// renormalized by the weight actually seen, so a partially evaluated
/// category is scored on the subset completed rather than penalized for
/// missing entries. Unscored criteria stay out of both numerator and
/// denominator.
pub fn score_category(category: &Category, scores: &ScoreSheet) -> f64 {
    let mut weighted_sum = 0.0;
    let mut weight_seen = 0.0;

    for criterion in &category.criteria {
        if let Some(raw) = scores.get(&criterion.id) {
            weighted_sum += (raw / criterion.max_score) * criterion.weight;
            weight_seen += criterion.weight;
        }
    }

    if weight_seen > 0.0 {
        (weighted_sum / weight_seen) * 100.0
    } else {
        0.0
    }
}

/// Overall percentage across categories; same renormalization one level up.
///
/// A category with zero scored criteria contributes to neither side of the
/// division: it is treated as not existing yet, not as 0%.
pub fn score_total(categories: &[Category], scores: &ScoreSheet) -> f64 {
    let mut weighted_sum = 0.0;
    let mut weight_seen = 0.0;

    for category in categories {
        if !has_scored_criteria(category, scores) {
            continue;
        }
        weighted_sum += (score_category(category, scores) / 100.0) * category.weight;
        weight_seen += category.weight;
    }

    if weight_seen > 0.0 {
        (weighted_sum / weight_seen) * 100.0
    } else {
        0.0
    }
}

/// Threshold comparison, boundary inclusive: exactly at the threshold
/// qualifies.
pub fn classify_award(total: f64, threshold: f64) -> AwardDecision {
    if total >= threshold {
        AwardDecision::Qualified
    } else {
        AwardDecision::NotQualified
    }
}

/// Assemble the full derived result for one vendor: every category's
/// percentage plus the overall total, which is `None` (undefined, not zero)
/// when the sheet is completely empty.
pub fn evaluate(template: &Template, vendor_id: &str, scores: &ScoreSheet) -> ScoreResult {
    let categories: Vec<CategoryScore> = template
        .categories
        .iter()
        .map(|category| CategoryScore {
            id: category.id.clone(),
            name: category.name.clone(),
            weight: category.weight,
            percentage: score_category(category, scores),
            scored_criteria: count_scored(category, scores),
            total_criteria: category.criteria.len(),
        })
        .collect();

    let any_scored = template
        .categories
        .iter()
        .any(|c| has_scored_criteria(c, scores));

    ScoreResult {
        vendor_id: vendor_id.to_string(),
        categories,
        total: any_scored.then(|| score_total(&template.categories, scores)),
    }
}

fn has_scored_criteria(category: &Category, scores: &ScoreSheet) -> bool {
    category.criteria.iter().any(|c| scores.contains_key(&c.id))
}

fn count_scored(category: &Category, scores: &ScoreSheet) -> usize {
    category
        .criteria
        .iter()
        .filter(|c| scores.contains_key(&c.id))
        .count()
}
