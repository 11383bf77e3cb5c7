//! Facet extraction over canonical records
//!
//! Pure functions deriving the selectable dimensions (brands, models,
//! categories, years) from whatever records the client returned. All of them
//! keep first-seen order except years, which are sorted newest first.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::record::{ModelYear, VehicleRecord};

/// A brand facet derived from the catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub id: Option<String>,
    pub name: String,
    pub logo_url: Option<String>,
}

impl Brand {
    /// Identity used for de-duplication: the id when present, else the name
    pub fn identity_key(&self) -> &str {
        self.id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or(&self.name)
    }

    fn from_record(record: &VehicleRecord) -> Self {
        Self {
            id: record.brand_id.clone(),
            name: record.brand_name.clone(),
            logo_url: record.brand_logo_url.clone(),
        }
    }
}

/// Unique brands in first-seen order; the first occurrence's logo wins
pub fn extract_brands(records: &[VehicleRecord]) -> Vec<Brand> {
    let mut seen = HashSet::new();
    let mut brands = Vec::new();

    for record in records {
        let brand = Brand::from_record(record);
        if seen.insert(brand.identity_key().to_string()) {
            brands.push(brand);
        }
    }

    brands
}

/// Unique model names of one brand (matched by name), first-seen order
pub fn extract_models(records: &[VehicleRecord], brand_name: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|r| r.brand_name == brand_name)
        .filter(|&r| seen.insert(r.model_name.as_str()))
        .map(|r| r.model_name.clone())
        .collect()
}

/// Unique specification tag display names, first-seen order
pub fn extract_categories(records: &[VehicleRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .flat_map(|r| r.specification_tags.iter())
        .filter(|&tag| seen.insert(tag.display_name.as_str()))
        .map(|tag| tag.display_name.clone())
        .collect()
}

/// Unique non-blank years, newest first
pub fn extract_years(records: &[VehicleRecord]) -> Vec<ModelYear> {
    let mut seen = HashSet::new();
    let mut years: Vec<ModelYear> = records
        .iter()
        .filter_map(|r| r.year.as_ref())
        .filter(|year| !year.is_blank())
        .filter(|&year| seen.insert(year))
        .cloned()
        .collect();

    years.sort_by(|a, b| b.cmp(a));
    years
}

/// Catalog-wide facets of a snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Facets {
    pub brands: Vec<Brand>,
    pub categories: Vec<String>,
    pub years: Vec<ModelYear>,
}

impl Facets {
    /// Compute the catalog-wide facets; models are per-brand and looked up on demand
    pub fn from_records(records: &[VehicleRecord]) -> Self {
        Self {
            brands: extract_brands(records),
            categories: extract_categories(records),
            years: extract_years(records),
        }
    }
}
