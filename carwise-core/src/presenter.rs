//! Input handed to whatever renders the wizard result

use serde::Serialize;

use crate::catalog::VehicleRecord;
use crate::wizard::ResolvedSelection;

/// The completed selection and the vehicle it matched, if any
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultView {
    pub selection: ResolvedSelection,
    pub vehicle: Option<VehicleRecord>,
    /// Matched against offline data; hosts show a non-blocking notice
    pub degraded: bool,
}

impl ResultView {
    pub fn headline(&self) -> String {
        format!(
            "{} {} {}",
            self.selection.brand.name, self.selection.model, self.selection.year
        )
    }

    /// Label/value pairs describing the selection and the matched vehicle
    pub fn detail_rows(&self) -> Vec<(&'static str, String)> {
        let mut rows = vec![
            ("Brand", self.selection.brand.name.clone()),
            ("Model", self.selection.model.clone()),
            ("Category", self.selection.category.clone()),
            ("Year", self.selection.year.to_string()),
            ("Bank", self.selection.bank.full_name.to_string()),
        ];

        let Some(vehicle) = &self.vehicle else {
            return rows;
        };

        let optional = [
            ("Transmission", vehicle.transmission.clone()),
            ("Power", vehicle.power.as_ref().map(ToString::to_string)),
            ("Seats", vehicle.seat_capacity.as_ref().map(ToString::to_string)),
            (
                "Fuel tank",
                vehicle.fuel_tank_capacity.as_ref().map(ToString::to_string),
            ),
        ];
        rows.extend(
            optional
                .into_iter()
                .filter_map(|(label, value)| value.map(|v| (label, v))),
        );

        let tags: Vec<&str> = vehicle
            .specification_tags
            .iter()
            .filter(|tag| tag.used)
            .map(|tag| tag.display_name.as_str())
            .collect();
        if !tags.is_empty() {
            rows.push(("Features", tags.join(", ")));
        }

        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::banks::BANKS;
    use crate::catalog::{Brand, ModelYear, SpecValue, SpecificationTag};

    fn view(vehicle: Option<VehicleRecord>) -> ResultView {
        ResultView {
            selection: ResolvedSelection {
                brand: Brand {
                    id: None,
                    name: "Ford".into(),
                    logo_url: None,
                },
                model: "Mustang".into(),
                category: "Premium".into(),
                year: ModelYear::Number(2022),
                bank: BANKS[3],
            },
            vehicle,
            degraded: false,
        }
    }

    #[test]
    fn test_headline() {
        assert_eq!(view(None).headline(), "Ford Mustang 2022");
    }

    #[test]
    fn test_rows_without_vehicle_cover_selection_only() {
        let rows = view(None).detail_rows();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[4], ("Bank", "Arab National Bank".to_string()));
    }

    #[test]
    fn test_rows_include_present_specs_and_used_tags() {
        let vehicle = VehicleRecord {
            id: "1".into(),
            brand_id: None,
            brand_name: "Ford".into(),
            brand_logo_url: None,
            model_name: "Mustang".into(),
            year: Some(ModelYear::Number(2022)),
            transmission: Some("Automatic".into()),
            seat_capacity: Some(SpecValue::Integer(4)),
            fuel_tank_capacity: None,
            power: Some(SpecValue::Integer(450)),
            specification_tags: vec![
                SpecificationTag {
                    id: "sport".into(),
                    display_name: "Sport".into(),
                    used: true,
                },
                SpecificationTag {
                    id: "luxury".into(),
                    display_name: "Luxury".into(),
                    used: false,
                },
            ],
            image_urls: vec![],
        };

        let rows = view(Some(vehicle)).detail_rows();
        let labels: Vec<&str> = rows.iter().map(|(label, _)| *label).collect();
        assert!(labels.contains(&"Transmission"));
        assert!(labels.contains(&"Power"));
        assert!(!labels.contains(&"Fuel tank"));
        assert_eq!(rows.last().map(|(_, v)| v.as_str()), Some("Sport"));
    }
}
