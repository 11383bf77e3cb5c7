//! Static catalog seed used when no live endpoint delivers data
//!
//! The synthesized catalog is the cross product of the seed brands, each
//! brand's model list and the fixed year list. Its shape and size are fixed;
//! the numeric specifications are drawn at random within bounded ranges.

use rand::Rng;
use std::ops::RangeInclusive;

use super::record::{ModelYear, SpecValue, SyntheticRecord, VehicleRecord, WireTag};

/// A brand entry in the seed table
#[derive(Debug, Clone, Copy)]
pub struct SeedBrand {
    pub id: &'static str,
    pub name: &'static str,
    pub logo_url: &'static str,
    pub models: &'static [&'static str],
}

pub const SEED_BRANDS: &[SeedBrand] = &[
    SeedBrand {
        id: "toyota",
        name: "Toyota",
        logo_url: "/assets/brands/toyota.png",
        models: &["Camry", "Corolla", "Land Cruiser", "RAV4", "Hilux", "Yaris"],
    },
    SeedBrand {
        id: "hyundai",
        name: "Hyundai",
        logo_url: "/assets/brands/hyundai.png",
        models: &["Elantra", "Sonata", "Tucson", "Santa Fe", "Accent", "Palisade"],
    },
    SeedBrand {
        id: "ford",
        name: "Ford",
        logo_url: "/assets/brands/ford.png",
        models: &["Mustang", "Explorer", "F-150", "Expedition", "Edge", "Ranger"],
    },
    SeedBrand {
        id: "nissan",
        name: "Nissan",
        logo_url: "/assets/brands/nissan.png",
        models: &["Altima", "Patrol", "Sunny", "X-Trail", "Maxima", "Pathfinder"],
    },
    SeedBrand {
        id: "kia",
        name: "Kia",
        logo_url: "/assets/brands/kia.png",
        models: &["Sportage", "Sorento", "K5", "Cerato", "Telluride", "Carnival"],
    },
    SeedBrand {
        id: "chevrolet",
        name: "Chevrolet",
        logo_url: "/assets/brands/chevrolet.png",
        models: &["Tahoe", "Malibu", "Silverado", "Camaro", "Captiva", "Suburban"],
    },
];

pub const SEED_CATEGORIES: &[&str] = &["Standard", "Premium", "Sport", "Luxury"];

pub const SEED_YEARS: &[i64] = &[2024, 2023, 2022, 2021];

pub const POWER_RANGE: RangeInclusive<i64> = 120..=450;
pub const FUEL_TANK_RANGE: RangeInclusive<i64> = 45..=90;
pub const SEAT_OPTIONS: &[i64] = &[2, 4, 5, 7];
const TRANSMISSIONS: &[&str] = &["Automatic", "Manual"];

/// Number of records [`synthesize`] always produces
pub fn synthetic_len() -> usize {
    SEED_BRANDS
        .iter()
        .map(|brand| brand.models.len() * SEED_YEARS.len())
        .sum()
}

/// Synthesize the offline catalog using the thread-local RNG
pub fn synthesize() -> Vec<VehicleRecord> {
    synthesize_with(&mut rand::rng())
}

/// Synthesize the offline catalog with a caller-provided RNG
pub fn synthesize_with<R: Rng>(rng: &mut R) -> Vec<VehicleRecord> {
    let mut records = Vec::with_capacity(synthetic_len());

    for brand in SEED_BRANDS {
        for model in brand.models {
            for year in SEED_YEARS {
                let wire = synthetic_entry(rng, brand, model, *year);
                if let Some(record) = wire.into_record() {
                    records.push(record);
                }
            }
        }
    }

    records
}

fn synthetic_entry<R: Rng>(
    rng: &mut R,
    brand: &SeedBrand,
    model: &str,
    year: i64,
) -> SyntheticRecord {
    let slug = model.to_lowercase().replace(' ', "-");
    let tags = SEED_CATEGORIES
        .iter()
        .map(|category| WireTag {
            id: Some(category.to_lowercase().into()),
            name: Some(category.to_string()),
            used: Some(rng.random_bool(0.5)),
            ..WireTag::default()
        })
        .collect();

    SyntheticRecord {
        object_id: None,
        id: Some(format!("synthetic-{}-{slug}-{year}", brand.id).into()),
        brand_id: Some(brand.id.into()),
        name: Some(brand.name.to_string()),
        avatar: Some(brand.logo_url.to_string()),
        model: Some(model.to_string()),
        year: Some(ModelYear::Number(year)),
        transmission: Some(TRANSMISSIONS[rng.random_range(0..TRANSMISSIONS.len())].to_string()),
        seat_capacity: Some(SpecValue::Integer(
            SEAT_OPTIONS[rng.random_range(0..SEAT_OPTIONS.len())],
        )),
        fuel_tank_capacity: Some(SpecValue::Integer(rng.random_range(FUEL_TANK_RANGE))),
        power: Some(SpecValue::Integer(rng.random_range(POWER_RANGE))),
        specifications: Some(tags),
        images: Some(vec![format!("/assets/vehicles/{}/{slug}.jpg", brand.id)]),
    }
}
