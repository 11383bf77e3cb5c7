//! Selection matching
//!
//! Finds the first catalog record matching a completed selection. Brand and
//! model must be equal (exact, case-sensitive); the year is compared only
//! when one was selected. The category is carried for display but is not a
//! match criterion.

use crate::catalog::{ModelYear, VehicleRecord};
use crate::wizard::ResolvedSelection;

/// What a record must satisfy to be the match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCriteria {
    pub brand: String,
    pub model: String,
    /// Not consulted by [`match_vehicle`]
    pub category: Option<String>,
    pub year: Option<ModelYear>,
}

impl MatchCriteria {
    pub fn new(brand: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            brand: brand.into(),
            model: model.into(),
            category: None,
            year: None,
        }
    }

    pub fn with_year(mut self, year: impl Into<ModelYear>) -> Self {
        self.year = Some(year.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    fn matches(&self, record: &VehicleRecord) -> bool {
        record.brand_name == self.brand
            && record.model_name == self.model
            && self
                .year
                .as_ref()
                .map_or(true, |year| record.year.as_ref() == Some(year))
    }
}

impl From<&ResolvedSelection> for MatchCriteria {
    fn from(selection: &ResolvedSelection) -> Self {
        Self {
            brand: selection.brand.name.clone(),
            model: selection.model.clone(),
            category: Some(selection.category.clone()),
            year: Some(selection.year.clone()),
        }
    }
}

/// First record satisfying the criteria, in catalog order
pub fn match_vehicle<'a>(
    criteria: &MatchCriteria,
    records: &'a [VehicleRecord],
) -> Option<&'a VehicleRecord> {
    records.iter().find(|record| criteria.matches(record))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, brand: &str, model: &str, year: Option<ModelYear>) -> VehicleRecord {
        VehicleRecord {
            id: id.to_string(),
            brand_id: None,
            brand_name: brand.to_string(),
            brand_logo_url: None,
            model_name: model.to_string(),
            year,
            transmission: None,
            seat_capacity: None,
            fuel_tank_capacity: None,
            power: None,
            specification_tags: vec![],
            image_urls: vec![],
        }
    }

    fn catalog() -> Vec<VehicleRecord> {
        vec![
            record("a", "Toyota", "Camry", Some(ModelYear::Number(2022))),
            record("b", "Toyota", "Camry", Some(ModelYear::Number(2023))),
            record("c", "Toyota", "Corolla", Some(ModelYear::from("2023"))),
            record("d", "Ford", "Mustang", None),
        ]
    }

    #[test]
    fn test_match_brand_model_year() {
        let records = catalog();
        let criteria = MatchCriteria::new("Toyota", "Camry").with_year("2023");
        assert_eq!(match_vehicle(&criteria, &records).map(|r| r.id.as_str()), Some("b"));
    }

    #[test]
    fn test_missing_combination_is_none() {
        let records = catalog();
        let criteria = MatchCriteria::new("Toyota", "Camry").with_year(ModelYear::Number(2021));
        assert!(match_vehicle(&criteria, &records).is_none());
    }

    #[test]
    fn test_category_is_ignored() {
        let records = catalog();
        let criteria = MatchCriteria::new("Toyota", "Camry")
            .with_year(ModelYear::Number(2023))
            .with_category("Something Unrelated");
        assert_eq!(match_vehicle(&criteria, &records).map(|r| r.id.as_str()), Some("b"));
    }

    #[test]
    fn test_without_year_first_record_wins() {
        let records = catalog();
        let criteria = MatchCriteria::new("Toyota", "Camry");
        assert_eq!(match_vehicle(&criteria, &records).map(|r| r.id.as_str()), Some("a"));
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let records = catalog();
        assert!(match_vehicle(&MatchCriteria::new("toyota", "Camry"), &records).is_none());
    }

    #[test]
    fn test_year_set_but_record_has_none() {
        let records = catalog();
        let criteria = MatchCriteria::new("Ford", "Mustang").with_year(ModelYear::Number(2022));
        assert!(match_vehicle(&criteria, &records).is_none());
    }

    #[test]
    fn test_same_reference_for_same_input() {
        let records = catalog();
        let criteria = MatchCriteria::new("Toyota", "Corolla").with_year(ModelYear::Number(2023));
        let first = match_vehicle(&criteria, &records).unwrap();
        let second = match_vehicle(&criteria, &records).unwrap();
        assert!(std::ptr::eq(first, second));
    }
}
