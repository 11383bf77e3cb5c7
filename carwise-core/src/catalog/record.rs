//! Canonical vehicle records and the wire shapes they are adapted from
//!
//! Upstream services deliver two structurally different shapes:
//!
//! ```text
//! live:      { "_id", "vehicle_brand_id": { "_id", "name", "avatar" }, "model", "year", ... }
//! synthetic: { "id", "brand_id", "name", "avatar", "model", "year", ... }
//! ```
//!
//! Each shape has its own serde struct and a total adapter into
//! [`VehicleRecord`]. Entries without a brand name or model name are dropped
//! by the adapters instead of failing the whole batch.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use tracing::{debug, warn};

/// A model year as delivered upstream, either a JSON number or a string.
///
/// Equality and hashing use the canonical text form, so `2023` and `"2023"`
/// are the same year. Whole floats such as `2023.0` deserialize as numbers.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ModelYear {
    Number(i64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireYear {
    Integer(i64),
    Decimal(f64),
    Text(String),
}

impl From<WireYear> for ModelYear {
    fn from(year: WireYear) -> Self {
        match year {
            WireYear::Integer(n) => ModelYear::Number(n),
            WireYear::Decimal(n) => match whole_number(n) {
                Some(n) => ModelYear::Number(n),
                None => ModelYear::Text(n.to_string()),
            },
            WireYear::Text(s) => ModelYear::Text(s),
        }
    }
}

impl<'de> Deserialize<'de> for ModelYear {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        WireYear::deserialize(deserializer).map(ModelYear::from)
    }
}

fn whole_number(n: f64) -> Option<i64> {
    let in_range = n.is_finite() && n.fract() == 0.0 && n.abs() < i64::MAX as f64;
    in_range.then_some(n as i64)
}

impl ModelYear {
    /// Numeric value, if the year is numeric or numeric text
    pub fn as_number(&self) -> Option<i64> {
        match self {
            ModelYear::Number(n) => Some(*n),
            ModelYear::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Canonical text used for equality
    pub fn canonical(&self) -> Cow<'_, str> {
        match (self, self.as_number()) {
            (_, Some(n)) => Cow::Owned(n.to_string()),
            (ModelYear::Text(s), None) => Cow::Borrowed(s.trim()),
            (ModelYear::Number(n), None) => Cow::Owned(n.to_string()),
        }
    }

    /// True for `0` and blank text, which the year facet skips
    pub fn is_blank(&self) -> bool {
        match self {
            ModelYear::Number(n) => *n == 0,
            ModelYear::Text(s) => s.trim().is_empty(),
        }
    }
}

impl PartialEq for ModelYear {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for ModelYear {}

impl Hash for ModelYear {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl Ord for ModelYear {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => self.canonical().cmp(&other.canonical()),
        }
    }
}

impl PartialOrd for ModelYear {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ModelYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl From<i64> for ModelYear {
    fn from(year: i64) -> Self {
        ModelYear::Number(year)
    }
}

impl From<&str> for ModelYear {
    fn from(year: &str) -> Self {
        ModelYear::Text(year.to_string())
    }
}

/// Lenient scalar for numeric specifications that sometimes arrive as text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpecValue {
    Integer(i64),
    Decimal(f64),
    Text(String),
}

impl fmt::Display for SpecValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecValue::Integer(n) => write!(f, "{n}"),
            SpecValue::Decimal(n) => write!(f, "{n}"),
            SpecValue::Text(s) => f.write_str(s),
        }
    }
}

/// One specification tag attached to a record (its display name is a category)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecificationTag {
    pub id: String,
    pub display_name: String,
    pub used: bool,
}

/// One catalog entry in canonical form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRecord {
    pub id: String,
    pub brand_id: Option<String>,
    /// Never empty
    pub brand_name: String,
    pub brand_logo_url: Option<String>,
    /// Never empty
    pub model_name: String,
    pub year: Option<ModelYear>,
    pub transmission: Option<String>,
    pub seat_capacity: Option<SpecValue>,
    pub fuel_tank_capacity: Option<SpecValue>,
    pub power: Option<SpecValue>,
    #[serde(default)]
    pub specification_tags: Vec<SpecificationTag>,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

// ============================================================================
// Wire shapes
// ============================================================================

/// Identifier as delivered upstream: text or a bare number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Text(String),
    Integer(i64),
    Decimal(f64),
}

impl WireId {
    /// Text form, `None` when blank
    pub fn into_text(self) -> Option<String> {
        match self {
            WireId::Text(s) => non_blank(Some(s)),
            WireId::Integer(n) => Some(n.to_string()),
            WireId::Decimal(n) => match whole_number(n) {
                Some(whole) => Some(whole.to_string()),
                None => Some(n.to_string()),
            },
        }
    }
}

impl From<&str> for WireId {
    fn from(id: &str) -> Self {
        WireId::Text(id.to_string())
    }
}

impl From<String> for WireId {
    fn from(id: String) -> Self {
        WireId::Text(id)
    }
}

/// First usable id among the candidates, in order
fn first_id<const N: usize>(candidates: [Option<WireId>; N]) -> Option<String> {
    candidates.into_iter().flatten().find_map(WireId::into_text)
}

/// Tag as delivered by either upstream shape
///
/// Documents may carry `_id`, `id` or both; they are kept apart and `_id` wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireTag {
    #[serde(default, rename = "_id", skip_serializing_if = "Option::is_none")]
    pub object_id: Option<WireId>,
    #[serde(default)]
    pub id: Option<WireId>,
    #[serde(default, alias = "display_name", alias = "displayName")]
    pub name: Option<String>,
    #[serde(default)]
    pub used: Option<bool>,
}

/// Brand object nested under `vehicle_brand_id` in the live shape
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LiveBrand {
    #[serde(default, rename = "_id")]
    pub object_id: Option<WireId>,
    #[serde(default)]
    pub id: Option<WireId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Live API record: brand nested under `vehicle_brand_id`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LiveRecord {
    #[serde(default, rename = "_id")]
    pub object_id: Option<WireId>,
    #[serde(default)]
    pub id: Option<WireId>,
    #[serde(default)]
    pub vehicle_brand_id: Option<LiveBrand>,
    #[serde(default, alias = "model_name")]
    pub model: Option<String>,
    #[serde(default)]
    pub year: Option<ModelYear>,
    #[serde(default)]
    pub transmission: Option<String>,
    #[serde(default)]
    pub seat_capacity: Option<SpecValue>,
    #[serde(default)]
    pub fuel_tank_capacity: Option<SpecValue>,
    #[serde(default)]
    pub power: Option<SpecValue>,
    #[serde(default, alias = "specification_tags")]
    pub specifications: Option<Vec<WireTag>>,
    #[serde(default, alias = "image_urls")]
    pub images: Option<Vec<String>>,
}

/// Synthetic record: brand portion flattened to top-level `name`/`avatar`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyntheticRecord {
    #[serde(default, rename = "_id", skip_serializing_if = "Option::is_none")]
    pub object_id: Option<WireId>,
    #[serde(default)]
    pub id: Option<WireId>,
    #[serde(default)]
    pub brand_id: Option<WireId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default, alias = "model_name")]
    pub model: Option<String>,
    #[serde(default)]
    pub year: Option<ModelYear>,
    #[serde(default)]
    pub transmission: Option<String>,
    #[serde(default)]
    pub seat_capacity: Option<SpecValue>,
    #[serde(default)]
    pub fuel_tank_capacity: Option<SpecValue>,
    #[serde(default)]
    pub power: Option<SpecValue>,
    #[serde(default, alias = "specification_tags")]
    pub specifications: Option<Vec<WireTag>>,
    #[serde(default, alias = "image_urls")]
    pub images: Option<Vec<String>>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn adapt_tags(tags: Vec<WireTag>) -> Vec<SpecificationTag> {
    tags.into_iter()
        .filter_map(|tag| {
            let display_name = non_blank(tag.name)?;
            Some(SpecificationTag {
                id: first_id([tag.object_id, tag.id]).unwrap_or_else(|| display_name.clone()),
                display_name,
                used: tag.used.unwrap_or(false),
            })
        })
        .collect()
}

fn fallback_id(brand: &str, model: &str, year: Option<&ModelYear>) -> String {
    match year {
        Some(year) => format!("{brand}-{model}-{year}"),
        None => format!("{brand}-{model}"),
    }
}

impl LiveRecord {
    /// Adapt into the canonical record; `None` when brand or model name is missing
    pub fn into_record(self) -> Option<VehicleRecord> {
        let brand = self.vehicle_brand_id.unwrap_or_default();
        let brand_name = non_blank(brand.name)?;
        let model_name = non_blank(self.model)?;
        let id = first_id([self.object_id, self.id])
            .unwrap_or_else(|| fallback_id(&brand_name, &model_name, self.year.as_ref()));

        Some(VehicleRecord {
            id,
            brand_id: first_id([brand.object_id, brand.id]),
            brand_name,
            brand_logo_url: non_blank(brand.avatar),
            model_name,
            year: self.year,
            transmission: non_blank(self.transmission),
            seat_capacity: self.seat_capacity,
            fuel_tank_capacity: self.fuel_tank_capacity,
            power: self.power,
            specification_tags: adapt_tags(self.specifications.unwrap_or_default()),
            image_urls: self.images.unwrap_or_default(),
        })
    }
}

impl SyntheticRecord {
    /// Adapt into the canonical record; `None` when brand or model name is missing
    pub fn into_record(self) -> Option<VehicleRecord> {
        let brand_name = non_blank(self.name)?;
        let model_name = non_blank(self.model)?;
        let id = first_id([self.object_id, self.id])
            .unwrap_or_else(|| fallback_id(&brand_name, &model_name, self.year.as_ref()));

        Some(VehicleRecord {
            id,
            brand_id: first_id([self.brand_id]),
            brand_name,
            brand_logo_url: non_blank(self.avatar),
            model_name,
            year: self.year,
            transmission: non_blank(self.transmission),
            seat_capacity: self.seat_capacity,
            fuel_tank_capacity: self.fuel_tank_capacity,
            power: self.power,
            specification_tags: adapt_tags(self.specifications.unwrap_or_default()),
            image_urls: self.images.unwrap_or_default(),
        })
    }
}

/// Adapt one raw array element, picking the shape by the `vehicle_brand_id` field
pub fn adapt_value(value: serde_json::Value) -> Option<VehicleRecord> {
    let is_live = value
        .get("vehicle_brand_id")
        .is_some_and(serde_json::Value::is_object);

    let adapted = if is_live {
        serde_json::from_value::<LiveRecord>(value).map(LiveRecord::into_record)
    } else {
        serde_json::from_value::<SyntheticRecord>(value).map(SyntheticRecord::into_record)
    };

    match adapted {
        Ok(Some(record)) => Some(record),
        Ok(None) => {
            debug!("Skipping catalog entry without brand or model name");
            None
        }
        Err(e) => {
            warn!(error = %e, "Skipping malformed catalog entry");
            None
        }
    }
}

/// Adapt every element of a raw array, dropping the ones that cannot be used
pub fn adapt_values(values: Vec<serde_json::Value>) -> Vec<VehicleRecord> {
    values.into_iter().filter_map(adapt_value).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_year_equality_across_representations() {
        assert_eq!(ModelYear::Number(2023), ModelYear::from("2023"));
        assert_eq!(ModelYear::from(" 2023 "), ModelYear::Number(2023));
        assert_ne!(ModelYear::Number(2023), ModelYear::Number(2022));
    }

    #[test]
    fn test_year_ordering() {
        let mut years = vec![
            ModelYear::from("2021"),
            ModelYear::Number(2024),
            ModelYear::from("unknown"),
            ModelYear::Number(2022),
        ];
        years.sort_by(|a, b| b.cmp(a));
        let rendered: Vec<String> = years.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["2024", "2022", "2021", "unknown"]);
    }

    #[test]
    fn test_blank_years() {
        assert!(ModelYear::Number(0).is_blank());
        assert!(ModelYear::from("  ").is_blank());
        assert!(!ModelYear::Number(2020).is_blank());
    }

    #[test]
    fn test_adapt_live_shape() {
        let record = adapt_value(json!({
            "_id": "v-1",
            "vehicle_brand_id": { "_id": "b-1", "name": "Toyota", "avatar": "https://cdn/toyota.png" },
            "model": "Camry",
            "year": 2023,
            "transmission": "Automatic",
            "seat_capacity": 5,
            "fuel_tank_capacity": "60",
            "power": 203.5,
            "specifications": [{ "_id": "s-1", "name": "Premium", "used": true }],
            "images": ["https://cdn/camry.jpg"]
        }))
        .unwrap();

        assert_eq!(record.id, "v-1");
        assert_eq!(record.brand_id.as_deref(), Some("b-1"));
        assert_eq!(record.brand_name, "Toyota");
        assert_eq!(record.brand_logo_url.as_deref(), Some("https://cdn/toyota.png"));
        assert_eq!(record.model_name, "Camry");
        assert_eq!(record.year, Some(ModelYear::Number(2023)));
        assert_eq!(record.seat_capacity, Some(SpecValue::Integer(5)));
        assert_eq!(record.fuel_tank_capacity, Some(SpecValue::Text("60".into())));
        assert_eq!(record.power, Some(SpecValue::Decimal(203.5)));
        assert_eq!(record.specification_tags[0].display_name, "Premium");
        assert!(record.specification_tags[0].used);
        assert_eq!(record.image_urls.len(), 1);
    }

    #[test]
    fn test_adapt_synthetic_shape() {
        let record = adapt_value(json!({
            "id": "synthetic-1",
            "brand_id": "ford",
            "name": "Ford",
            "avatar": "/logos/ford.png",
            "model": "Mustang",
            "year": "2022",
            "specifications": [{ "id": "sport", "name": "Sport", "used": false }]
        }))
        .unwrap();

        assert_eq!(record.brand_name, "Ford");
        assert_eq!(record.brand_id.as_deref(), Some("ford"));
        assert_eq!(record.brand_logo_url.as_deref(), Some("/logos/ford.png"));
        assert_eq!(record.year, Some(ModelYear::Number(2022)));
        assert_eq!(record.specification_tags[0].id, "sport");
    }

    #[test]
    fn test_adapt_tolerates_missing_nested_fields() {
        let record = adapt_value(json!({
            "vehicle_brand_id": { "name": "Kia" },
            "model": "Sportage"
        }))
        .unwrap();

        assert!(record.specification_tags.is_empty());
        assert!(record.image_urls.is_empty());
        assert!(record.brand_id.is_none());
        assert_eq!(record.id, "Kia-Sportage");
    }

    #[test]
    fn test_adapt_drops_entries_without_names() {
        assert!(adapt_value(json!({ "vehicle_brand_id": { "name": "" }, "model": "X" })).is_none());
        assert!(adapt_value(json!({ "name": "Ford" })).is_none());
        assert!(adapt_value(json!("not an object")).is_none());
    }

    #[test]
    fn test_bare_brand_id_string_uses_synthetic_adapter() {
        // A string `vehicle_brand_id` is not a nested brand; the flat name applies
        let record = adapt_value(json!({
            "vehicle_brand_id": "b-9",
            "name": "Nissan",
            "model": "Patrol"
        }))
        .unwrap();
        assert_eq!(record.brand_name, "Nissan");
    }

    #[test]
    fn test_adapt_accepts_both_object_id_and_id() {
        let record = adapt_value(json!({
            "_id": "64f",
            "id": "64f-virtual",
            "vehicle_brand_id": { "_id": "b1", "id": "b1", "name": "Toyota" },
            "model": "Camry",
            "year": 2023,
            "specifications": [{ "_id": "s1", "id": "s1", "name": "Premium" }]
        }))
        .unwrap();

        assert_eq!(record.id, "64f");
        assert_eq!(record.brand_id.as_deref(), Some("b1"));
        assert_eq!(record.specification_tags[0].id, "s1");

        let record = adapt_value(json!({
            "_id": "s-1", "id": "s-1", "name": "Ford", "model": "Ranger"
        }))
        .unwrap();
        assert_eq!(record.id, "s-1");
    }

    #[test]
    fn test_adapt_accepts_numeric_ids() {
        let record = adapt_value(json!({
            "id": 7, "brand_id": 3, "name": "Ford", "model": "Mustang", "year": 2022
        }))
        .unwrap();
        assert_eq!(record.id, "7");
        assert_eq!(record.brand_id.as_deref(), Some("3"));

        let record = adapt_value(json!({
            "_id": 12,
            "vehicle_brand_id": { "_id": 4.0, "name": "Kia" },
            "model": "K5",
            "specifications": [{ "id": 9, "name": "Sport" }]
        }))
        .unwrap();
        assert_eq!(record.id, "12");
        assert_eq!(record.brand_id.as_deref(), Some("4"));
        assert_eq!(record.specification_tags[0].id, "9");
    }

    #[test]
    fn test_blank_object_id_falls_back_to_id() {
        let record = adapt_value(json!({
            "_id": " ", "id": "v-2", "name": "Nissan", "model": "Patrol"
        }))
        .unwrap();
        assert_eq!(record.id, "v-2");
    }

    #[test]
    fn test_float_years_are_kept() {
        let record = adapt_value(json!({ "name": "Ford", "model": "Edge", "year": 2023.0 })).unwrap();
        assert_eq!(record.year, Some(ModelYear::Number(2023)));

        let record = adapt_value(json!({ "name": "Ford", "model": "Edge", "year": 2023.5 })).unwrap();
        assert_eq!(record.year, Some(ModelYear::Text("2023.5".to_string())));
    }

    #[test]
    fn test_adapt_values_keeps_usable_entries() {
        let records = adapt_values(vec![
            json!({ "vehicle_brand_id": { "name": "Toyota" }, "model": "Camry" }),
            json!({ "model": "Orphan" }),
            json!({ "name": "Ford", "model": "Ranger" }),
        ]);
        assert_eq!(records.len(), 2);
    }
}
