use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{MatrixError, Template};
use crate::scoring::ScoreSheet;

/// Persisted vendor roster with their sparse score sheets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorBook {
    pub version: u32,
    #[serde(default)]
    pub vendors: Vec<Vendor>,
}

/// One vendor under evaluation. `scores` maps criterion id to the raw score
/// entered by the evaluator; a missing key means not yet evaluated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vendor {
    pub id: String,
    pub name: String,
    pub added_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub scores: ScoreSheet,
}

impl Default for VendorBook {
    fn default() -> Self {
        Self::new()
    }
}

impl VendorBook {
    /// Create a new empty book with version 1
    pub fn new() -> Self {
        Self {
            version: 1,
            vendors: Vec::new(),
        }
    }

    /// Add a vendor, deriving its id from the display name.
    /// Returns the derived id.
    pub fn add_vendor(&mut self, name: &str) -> Result<String, MatrixError> {
        let id = crate::model::slugify(name);
        if id.is_empty() {
            return Err(MatrixError::InvalidVendorName {
                name: name.to_string(),
            });
        }
        if self.vendors.iter().any(|v| v.id == id) {
            return Err(MatrixError::DuplicateId { id });
        }
        let now = Utc::now();
        self.vendors.push(Vendor {
            id: id.clone(),
            name: name.to_string(),
            added_at: now,
            updated_at: now,
            scores: ScoreSheet::new(),
        });
        Ok(id)
    }

    /// Remove a vendor and all of its scores.
    /// Returns true if the vendor existed, false otherwise.
    pub fn remove_vendor(&mut self, id: &str) -> bool {
        let before = self.vendors.len();
        self.vendors.retain(|v| v.id != id);
        self.vendors.len() != before
    }

    /// Look up a vendor by id.
    pub fn vendor(&self, id: &str) -> Result<&Vendor, MatrixError> {
        self.vendors
            .iter()
            .find(|v| v.id == id)
            .ok_or_else(|| MatrixError::VendorNotFound { id: id.to_string() })
    }

    /// Record a raw score for one criterion on a vendor's sheet.
    ///
    /// Fails with the missing id when the criterion or vendor is unknown,
    /// and rejects values outside 0..=max_score (NaN included) before they
    /// can reach the percentage math.
    pub fn record_score(
        &mut self,
        template: &Template,
        vendor_id: &str,
        criterion_id: &str,
        value: f64,
    ) -> Result<(), MatrixError> {
        let criterion = template.criterion(criterion_id)?;
        if !(value >= 0.0 && value <= criterion.max_score) {
            return Err(MatrixError::ScoreOutOfRange {
                id: criterion_id.to_string(),
                value,
                max: criterion.max_score,
            });
        }

        let vendor = self
            .vendors
            .iter_mut()
            .find(|v| v.id == vendor_id)
            .ok_or_else(|| MatrixError::VendorNotFound {
                id: vendor_id.to_string(),
            })?;
        vendor.scores.insert(criterion_id.to_string(), value);
        vendor.updated_at = Utc::now();
        Ok(())
    }

    /// Return a criterion to "not yet evaluated" on a vendor's sheet.
    /// Returns true if a score was previously present.
    pub fn clear_score(&mut self, vendor_id: &str, criterion_id: &str) -> Result<bool, MatrixError> {
        let vendor = self
            .vendors
            .iter_mut()
            .find(|v| v.id == vendor_id)
            .ok_or_else(|| MatrixError::VendorNotFound {
                id: vendor_id.to_string(),
            })?;
        let was_present = vendor.scores.remove(criterion_id).is_some();
        if was_present {
            vendor.updated_at = Utc::now();
        }
        Ok(was_present)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_book_empty() {
        let book = VendorBook::new();
        assert_eq!(book.version, 1);
        assert!(book.vendors.is_empty());
    }

    #[test]
    fn test_add_vendor_derives_id() {
        let mut book = VendorBook::new();
        let id = book.add_vendor("Acme Corp").unwrap();
        assert_eq!(id, "acme-corp");
        assert_eq!(book.vendor("acme-corp").unwrap().name, "Acme Corp");
    }

    #[test]
    fn test_add_duplicate_vendor_rejected() {
        let mut book = VendorBook::new();
        book.add_vendor("Acme Corp").unwrap();
        let err = book.add_vendor("acme corp").unwrap_err();
        assert_eq!(
            err,
            MatrixError::DuplicateId {
                id: "acme-corp".to_string()
            }
        );
    }

    #[test]
    fn test_remove_vendor() {
        let mut book = VendorBook::new();
        book.add_vendor("Acme Corp").unwrap();
        assert!(book.remove_vendor("acme-corp"));
        assert!(!book.remove_vendor("acme-corp"));
        assert!(book.vendor("acme-corp").is_err());
    }

    #[test]
    fn test_record_score() {
        let template = Template::sample();
        let mut book = VendorBook::new();
        book.add_vendor("Acme").unwrap();

        book.record_score(&template, "acme", "pricing", 4.0).unwrap();
        assert_eq!(book.vendor("acme").unwrap().scores["pricing"], 4.0);
    }

    #[test]
    fn test_record_score_unknown_criterion() {
        let template = Template::sample();
        let mut book = VendorBook::new();
        book.add_vendor("Acme").unwrap();

        let err = book
            .record_score(&template, "acme", "nonsense", 4.0)
            .unwrap_err();
        assert_eq!(
            err,
            MatrixError::CriterionNotFound {
                id: "nonsense".to_string()
            }
        );
    }

    #[test]
    fn test_record_score_unknown_vendor() {
        let template = Template::sample();
        let mut book = VendorBook::new();
        let err = book
            .record_score(&template, "ghost", "pricing", 4.0)
            .unwrap_err();
        assert!(matches!(err, MatrixError::VendorNotFound { .. }));
    }

    #[test]
    fn test_record_score_out_of_range() {
        let template = Template::sample();
        let mut book = VendorBook::new();
        book.add_vendor("Acme").unwrap();

        for bad in [5.1, -0.5, f64::NAN] {
            let err = book
                .record_score(&template, "acme", "pricing", bad)
                .unwrap_err();
            assert!(matches!(err, MatrixError::ScoreOutOfRange { .. }));
        }
        // Boundaries are valid scores
        book.record_score(&template, "acme", "pricing", 0.0).unwrap();
        book.record_score(&template, "acme", "pricing", 5.0).unwrap();
    }

    #[test]
    fn test_clear_score() {
        let template = Template::sample();
        let mut book = VendorBook::new();
        book.add_vendor("Acme").unwrap();
        book.record_score(&template, "acme", "pricing", 4.0).unwrap();

        assert!(book.clear_score("acme", "pricing").unwrap());
        assert!(!book.clear_score("acme", "pricing").unwrap());
        assert!(!book.vendor("acme").unwrap().scores.contains_key("pricing"));
    }

    #[test]
    fn test_clear_score_unknown_vendor() {
        let mut book = VendorBook::new();
        assert!(matches!(
            book.clear_score("ghost", "pricing"),
            Err(MatrixError::VendorNotFound { .. })
        ));
    }
}
