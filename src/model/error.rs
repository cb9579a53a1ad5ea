use thiserror::Error;

/// Domain errors raised at template-edit and score-entry time.
///
/// Lookups fail loudly with the offending id instead of letting a missing
/// entry turn into NaN somewhere downstream in the percentage math.
#[derive(Debug, Error, PartialEq)]
pub enum MatrixError {
    #[error("category '{id}' not found in template")]
    CategoryNotFound { id: String },

    #[error("criterion '{id}' not found in template")]
    CriterionNotFound { id: String },

    #[error("vendor '{id}' not found")]
    VendorNotFound { id: String },

    #[error("score {value} for criterion '{id}' is outside 0..={max}")]
    ScoreOutOfRange { id: String, value: f64, max: f64 },

    #[error("weight {value} for '{id}' is outside 0..=1")]
    InvalidWeight { id: String, value: f64 },

    #[error("max score {value} for '{id}' must be a positive number")]
    InvalidMaxScore { id: String, value: f64 },

    #[error("'{name}' does not produce a usable id")]
    EmptyId { name: String },

    #[error("id '{id}' already exists")]
    DuplicateId { id: String },

    #[error("'{name}' does not produce a usable vendor id")]
    InvalidVendorName { name: String },
}
