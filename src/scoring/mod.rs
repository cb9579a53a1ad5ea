pub mod config;
pub mod engine;
pub mod validation;

pub use config::ScoringConfig;
pub use engine::{
    classify_award, evaluate, score_category, score_total, AwardDecision, CategoryScore,
    ScoreResult, ScoreSheet,
};
pub use validation::{validate_scoring, validate_template};
