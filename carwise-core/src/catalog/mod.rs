//! Vehicle catalog: loading, offline seed, record adaptation and facets
//!
//! # Architecture
//!
//! ```text
//! StaticCatalogSeed ─┐
//!                    ▼
//! endpoints ──▶ CatalogClient ──▶ CatalogSnapshot ──▶ facets (brands, models,
//!                                                      categories, years)
//! ```

mod client;
mod endpoint;
mod normalize;
mod record;
pub mod seed;

pub use client::{
    interpret_body, is_html_document, CatalogClient, CatalogEvent, CatalogSnapshot, CatalogSource,
};
pub use endpoint::{CatalogEndpoint, FetchedBody};
#[cfg(feature = "http")]
pub use endpoint::HttpEndpoint;
pub use normalize::{
    extract_brands, extract_categories, extract_models, extract_years, Brand, Facets,
};
pub use record::{
    adapt_value, adapt_values, LiveBrand, LiveRecord, ModelYear, SpecValue, SpecificationTag,
    SyntheticRecord, VehicleRecord, WireId, WireTag,
};
