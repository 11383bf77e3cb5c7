//! One wizard session: a state, the catalog it was started with, and the
//! options offered at each step

use serde::Serialize;
use tracing::debug;

use super::state::{Choice, PaymentMethod, Step, WizardState};
use crate::banks::{Bank, BANKS};
use crate::catalog::{extract_models, CatalogSnapshot, Facets, ModelYear};
use crate::matcher::{match_vehicle, MatchCriteria};
use crate::presenter::ResultView;

/// Flattened, serializable view of the wizard for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardSnapshot {
    pub state: &'static str,
    pub payment_method: Option<PaymentMethod>,
    /// 0 (brand) through 4 (bank); 0 outside the finance flow
    pub step_index: usize,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub category: Option<String>,
    pub year: Option<ModelYear>,
    pub bank: Option<Bank>,
    pub result_visible: bool,
}

impl From<&WizardState> for WizardSnapshot {
    fn from(state: &WizardState) -> Self {
        let selections = state.selections();
        Self {
            state: state.name(),
            payment_method: state.payment_method(),
            step_index: state.step().map_or(0, Step::index),
            brand: selections.brand.map(|brand| brand.name),
            model: selections.model,
            category: selections.category,
            year: selections.year,
            bank: selections.bank,
            result_visible: state.is_result_visible(),
        }
    }
}

/// Values selectable at the active step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOptions {
    pub step: Step,
    pub choices: Vec<Choice>,
}

impl StepOptions {
    pub fn labels(&self) -> Vec<String> {
        self.choices.iter().map(Choice::label).collect()
    }

    /// Option whose label matches, ignoring ASCII case and surrounding space
    pub fn find(&self, label: &str) -> Option<&Choice> {
        let label = label.trim();
        self.choices
            .iter()
            .find(|choice| choice.label().eq_ignore_ascii_case(label))
    }
}

/// Wizard bound to one catalog snapshot
#[derive(Debug, Clone)]
pub struct WizardSession {
    state: WizardState,
    catalog: CatalogSnapshot,
    facets: Facets,
}

impl WizardSession {
    pub fn new(catalog: CatalogSnapshot) -> Self {
        let facets = Facets::from_records(&catalog.records);
        debug!(
            records = catalog.records.len(),
            brands = facets.brands.len(),
            degraded = catalog.degraded,
            "Wizard session started"
        );
        Self {
            state: WizardState::new(),
            catalog,
            facets,
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn catalog(&self) -> &CatalogSnapshot {
        &self.catalog
    }

    pub fn facets(&self) -> &Facets {
        &self.facets
    }

    pub fn is_degraded(&self) -> bool {
        self.catalog.degraded
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        WizardSnapshot::from(&self.state)
    }

    /// Options for the step awaiting input, or `None` outside it
    pub fn options(&self) -> Option<StepOptions> {
        let step = self.state.active_step()?;
        let choices: Vec<Choice> = match step {
            Step::Brand => self.facets.brands.iter().cloned().map(Choice::Brand).collect(),
            Step::Model => {
                let brand = self.state.selections().brand?;
                extract_models(&self.catalog.records, &brand.name)
                    .into_iter()
                    .map(Choice::Model)
                    .collect()
            }
            Step::Category => self
                .facets
                .categories
                .iter()
                .cloned()
                .map(Choice::Category)
                .collect(),
            Step::Year => self.facets.years.iter().cloned().map(Choice::Year).collect(),
            Step::Bank => BANKS.iter().copied().map(Choice::Bank).collect(),
        };
        Some(StepOptions { step, choices })
    }

    /// Returns whether the state changed
    pub fn choose_method(&mut self, method: PaymentMethod) -> bool {
        if let Err(reason) = self.state.check_choose_method() {
            debug!(method = %method, %reason, "Ignoring method choice");
            return false;
        }
        self.apply(|state| state.choose_method(method));
        true
    }

    /// Returns whether the state changed
    pub fn select(&mut self, step: Step, choice: Choice) -> bool {
        if let Err(reason) = self.state.check_select(step, &choice) {
            debug!(step = %step, %reason, "Ignoring selection");
            return false;
        }
        self.apply(|state| state.select(step, choice));
        true
    }

    /// Select the option at `index` of the active step
    pub fn select_index(&mut self, index: usize) -> bool {
        let Some(options) = self.options() else {
            debug!(index, "Ignoring selection outside the finance steps");
            return false;
        };
        match options.choices.into_iter().nth(index) {
            Some(choice) => self.select(options.step, choice),
            None => {
                debug!(index, step = %options.step, "Option index out of range");
                false
            }
        }
    }

    /// Select the option of the active step with this label
    pub fn select_label(&mut self, label: &str) -> bool {
        let Some(options) = self.options() else {
            debug!(label, "Ignoring selection outside the finance steps");
            return false;
        };
        match options.find(label).cloned() {
            Some(choice) => self.select(options.step, choice),
            None => {
                debug!(label, step = %options.step, "No option with this label");
                false
            }
        }
    }

    /// Returns whether the state changed
    pub fn back(&mut self) -> bool {
        if let Err(reason) = self.state.check_back() {
            debug!(state = self.state.name(), %reason, "Ignoring back");
            return false;
        }
        self.apply(WizardState::back);
        true
    }

    pub fn reset(&mut self) {
        self.apply(WizardState::reset);
    }

    /// Match the completed selection against the session's catalog
    pub fn result_view(&self) -> Option<ResultView> {
        let selection = self.state.resolved()?;
        let criteria = MatchCriteria::from(selection);
        let vehicle = match_vehicle(&criteria, &self.catalog.records).cloned();

        debug!(
            brand = %criteria.brand,
            model = %criteria.model,
            matched = vehicle.is_some(),
            "Resolved wizard result"
        );

        Some(ResultView {
            selection: selection.clone(),
            vehicle,
            degraded: self.catalog.degraded,
        })
    }

    fn apply(&mut self, transition: impl FnOnce(WizardState) -> WizardState) {
        let from = self.state.name();
        self.state = transition(std::mem::take(&mut self.state));
        debug!(from, to = self.state.name(), "Wizard transition");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogSnapshot;
    use pretty_assertions::assert_eq;

    fn session() -> WizardSession {
        WizardSession::new(CatalogSnapshot::synthetic())
    }

    #[test]
    fn test_no_options_before_finance() {
        let mut session = session();
        assert!(session.options().is_none());

        session.choose_method(PaymentMethod::Cash);
        assert!(session.options().is_none());
        assert_eq!(session.snapshot().payment_method, Some(PaymentMethod::Cash));
    }

    #[test]
    fn test_options_follow_steps() {
        let mut session = session();
        session.choose_method(PaymentMethod::Finance);

        let brands = session.options().unwrap();
        assert_eq!(brands.step, Step::Brand);
        assert_eq!(brands.choices.len(), 6);

        assert!(session.select_label("Ford"));
        let models = session.options().unwrap();
        assert_eq!(models.step, Step::Model);
        assert!(models.labels().contains(&"Mustang".to_string()));
        assert_eq!(models.choices.len(), 6);

        assert!(session.select_label("mustang"));
        assert_eq!(session.options().unwrap().labels(), vec!["Standard", "Premium", "Sport", "Luxury"]);

        assert!(session.select_label("Premium"));
        assert_eq!(session.options().unwrap().labels(), vec!["2024", "2023", "2022", "2021"]);

        assert!(session.select_label("2022"));
        assert_eq!(session.options().unwrap().choices.len(), BANKS.len());
    }

    #[test]
    fn test_unknown_label_and_index_are_ignored() {
        let mut session = session();
        session.choose_method(PaymentMethod::Finance);

        assert!(!session.select_label("Tesla"));
        assert!(!session.select_index(99));
        assert_eq!(session.snapshot().step_index, 0);
    }

    #[test]
    fn test_result_view_matches_synthetic_record() {
        let mut session = session();
        session.choose_method(PaymentMethod::Finance);
        for label in ["Toyota", "Camry", "Luxury", "2023", "ANB"] {
            assert!(session.select_label(label), "could not select {label}");
        }

        let snapshot = session.snapshot();
        assert!(snapshot.result_visible);
        assert_eq!(snapshot.step_index, 4);

        let view = session.result_view().unwrap();
        assert!(view.degraded);
        let vehicle = view.vehicle.unwrap();
        assert_eq!(vehicle.brand_name, "Toyota");
        assert_eq!(vehicle.model_name, "Camry");
        assert_eq!(vehicle.year, Some(ModelYear::Number(2023)));
    }

    #[test]
    fn test_result_view_absent_until_result() {
        let mut session = session();
        assert!(session.result_view().is_none());
        session.choose_method(PaymentMethod::Finance);
        assert!(session.result_view().is_none());
    }

    #[test]
    fn test_ignored_transitions_report_false() {
        let mut session = session();
        assert!(!session.back());
        assert!(session.choose_method(PaymentMethod::Finance));
        assert!(!session.choose_method(PaymentMethod::Cash));
        assert!(!session.select(Step::Year, Choice::Year(ModelYear::Number(2022))));
        assert!(session.back());
        assert_eq!(session.state(), &WizardState::NoMethod);
    }

    #[test]
    fn test_reset_starts_over() {
        let mut session = session();
        session.choose_method(PaymentMethod::Finance);
        session.select_index(0);
        session.reset();
        assert_eq!(session.snapshot().state, "NoMethod");
        assert_eq!(session.snapshot().brand, None);
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let mut session = session();
        session.choose_method(PaymentMethod::Finance);
        let json = serde_json::to_value(session.snapshot()).unwrap();
        assert_eq!(json["paymentMethod"], "finance");
        assert_eq!(json["stepIndex"], 0);
        assert_eq!(json["resultVisible"], false);
    }
}
