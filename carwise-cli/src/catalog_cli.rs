//! Catalog browsing and matching commands

use anyhow::{Context, Result};
use serde::Serialize;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

use carwise_core::catalog::{extract_models, Facets, ModelYear};
use carwise_core::{match_vehicle, CatalogEvent, CatalogSnapshot, CatalogSource, MatchCriteria};

#[derive(Tabled)]
struct BrandTableRow {
    #[tabled(rename = "Brand")]
    name: String,
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Models")]
    models: String,
}

#[derive(Tabled)]
struct AttemptTableRow {
    #[tabled(rename = "Endpoint")]
    endpoint: String,
    #[tabled(rename = "Outcome")]
    outcome: String,
}

#[derive(Serialize)]
struct CatalogSummary<'a> {
    source: &'a CatalogSource,
    degraded: bool,
    records: usize,
    #[serde(flatten)]
    facets: &'a Facets,
}

fn source_label(source: &CatalogSource) -> String {
    match source {
        CatalogSource::Endpoint(url) => url.clone(),
        CatalogSource::Synthetic => "offline seed".to_string(),
    }
}

fn attempt_rows(events: &[CatalogEvent]) -> Vec<AttemptTableRow> {
    events
        .iter()
        .filter_map(|event| match event {
            CatalogEvent::AttemptFailed { endpoint, error } => Some(AttemptTableRow {
                endpoint: endpoint.clone(),
                outcome: error.to_string(),
            }),
            CatalogEvent::Loaded { endpoint, records } => Some(AttemptTableRow {
                endpoint: endpoint.clone(),
                outcome: format!("{records} records"),
            }),
            _ => None,
        })
        .collect()
}

fn render<T: Tabled>(rows: &[T]) -> String {
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string()
}

/// `carwise catalog`
pub fn show_catalog(snapshot: &CatalogSnapshot, events: &[CatalogEvent], json: bool) -> Result<()> {
    let facets = Facets::from_records(&snapshot.records);

    if json {
        let summary = CatalogSummary {
            source: &snapshot.source,
            degraded: snapshot.degraded,
            records: snapshot.records.len(),
            facets: &facets,
        };
        let output =
            serde_json::to_string_pretty(&summary).context("Failed to serialize catalog")?;
        println!("{output}");
        return Ok(());
    }

    println!(
        "Catalog: {} records from {}{}\n",
        snapshot.records.len(),
        source_label(&snapshot.source),
        if snapshot.degraded { " (degraded)" } else { "" }
    );

    let attempts = attempt_rows(events);
    if !attempts.is_empty() {
        println!("{}\n", render(&attempts));
    }

    let brands: Vec<BrandTableRow> = facets
        .brands
        .iter()
        .map(|brand| BrandTableRow {
            name: brand.name.clone(),
            id: brand.id.clone().unwrap_or_else(|| "-".to_string()),
            models: extract_models(&snapshot.records, &brand.name).join(", "),
        })
        .collect();

    if brands.is_empty() {
        println!("No brands found.");
    } else {
        println!("{}", render(&brands));
    }

    let years: Vec<String> = facets.years.iter().map(ToString::to_string).collect();
    println!("\nCategories: {}", facets.categories.join(", "));
    println!("Years:      {}", years.join(", "));

    Ok(())
}

/// Interpret a year given on the command line
pub fn parse_year(value: &str) -> ModelYear {
    match value.trim().parse::<i64>() {
        Ok(year) => ModelYear::Number(year),
        Err(_) => ModelYear::Text(value.trim().to_string()),
    }
}

/// `carwise match`
pub fn show_match(
    snapshot: &CatalogSnapshot,
    brand: String,
    model: String,
    year: Option<String>,
    json: bool,
) -> Result<()> {
    let mut criteria = MatchCriteria::new(brand, model);
    if let Some(year) = year.as_deref() {
        criteria = criteria.with_year(parse_year(year));
    }

    let matched = match_vehicle(&criteria, &snapshot.records);

    if json {
        let output = serde_json::to_string_pretty(&matched).context("Failed to serialize match")?;
        println!("{output}");
        return Ok(());
    }

    match matched {
        Some(record) => {
            println!(
                "{} {} {} ({})",
                record.brand_name,
                record.model_name,
                record
                    .year
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
                record.id
            );
            if let Some(power) = &record.power {
                println!("  Power:     {power}");
            }
            if let Some(seats) = &record.seat_capacity {
                println!("  Seats:     {seats}");
            }
            if let Some(fuel) = &record.fuel_tank_capacity {
                println!("  Fuel tank: {fuel}");
            }
        }
        None => println!("No match"),
    }

    Ok(())
}
