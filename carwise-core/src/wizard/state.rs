//! Wizard state machine
//!
//! ```text
//!            choose_method(Cash)
//! NoMethod ─────────────────────▶ Cash
//!    │ ▲
//!    │ │ back (step 0)
//!    ▼ │
//! Finance: Brand ─▶ Model ─▶ Category ─▶ Year ─▶ Bank ─▶ Result
//!                ◀─        ◀─          ◀─      ◀─     ◀─
//!                              back
//! ```
//!
//! Transitions consume the state and return the next one. A call that is not
//! valid for the current state returns it unchanged; [`WizardState::check_select`]
//! and friends report why.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::banks::Bank;
use crate::catalog::{Brand, ModelYear};

/// How the customer intends to pay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Finance,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Finance => "finance",
        }
    }

    /// Parse the method names accepted on the command line
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cash" => Some(PaymentMethod::Cash),
            "finance" => Some(PaymentMethod::Finance),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One position in the finance flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Step {
    Brand = 0,
    Model = 1,
    Category = 2,
    Year = 3,
    Bank = 4,
}

impl Step {
    pub const ALL: [Step; 5] = [Step::Brand, Step::Model, Step::Category, Step::Year, Step::Bank];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Step::Brand),
            1 => Some(Step::Model),
            2 => Some(Step::Category),
            3 => Some(Step::Year),
            4 => Some(Step::Bank),
            _ => None,
        }
    }

    /// The following step; the bank step has none
    pub const fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub const fn previous(self) -> Option<Self> {
        match self {
            Step::Brand => None,
            Step::Model => Some(Step::Brand),
            Step::Category => Some(Step::Model),
            Step::Year => Some(Step::Category),
            Step::Bank => Some(Step::Year),
        }
    }

    /// Prompt shown to the customer
    pub const fn title(self) -> &'static str {
        match self {
            Step::Brand => "Choose a brand",
            Step::Model => "Choose a model",
            Step::Category => "Choose a category",
            Step::Year => "Choose a model year",
            Step::Bank => "Choose a financing bank",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Brand => "brand",
            Step::Model => "model",
            Step::Category => "category",
            Step::Year => "year",
            Step::Bank => "bank",
        };
        f.write_str(name)
    }
}

/// A value picked at one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    Brand(Brand),
    Model(String),
    Category(String),
    Year(ModelYear),
    Bank(Bank),
}

impl Choice {
    /// The step this value belongs to
    pub fn step(&self) -> Step {
        match self {
            Choice::Brand(_) => Step::Brand,
            Choice::Model(_) => Step::Model,
            Choice::Category(_) => Step::Category,
            Choice::Year(_) => Step::Year,
            Choice::Bank(_) => Step::Bank,
        }
    }

    /// Text shown for this value in option lists
    pub fn label(&self) -> String {
        match self {
            Choice::Brand(brand) => brand.name.clone(),
            Choice::Model(model) => model.clone(),
            Choice::Category(category) => category.clone(),
            Choice::Year(year) => year.to_string(),
            Choice::Bank(bank) => bank.name.to_string(),
        }
    }
}

/// Fields collected so far in the finance flow
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selections {
    pub brand: Option<Brand>,
    pub model: Option<String>,
    pub category: Option<String>,
    pub year: Option<ModelYear>,
    pub bank: Option<Bank>,
}

impl Selections {
    pub fn is_set(&self, step: Step) -> bool {
        match step {
            Step::Brand => self.brand.is_some(),
            Step::Model => self.model.is_some(),
            Step::Category => self.category.is_some(),
            Step::Year => self.year.is_some(),
            Step::Bank => self.bank.is_some(),
        }
    }

    fn set(&mut self, choice: Choice) {
        match choice {
            Choice::Brand(brand) => self.brand = Some(brand),
            Choice::Model(model) => self.model = Some(model),
            Choice::Category(category) => self.category = Some(category),
            Choice::Year(year) => self.year = Some(year),
            Choice::Bank(bank) => self.bank = Some(bank),
        }
    }

    fn clear(&mut self, step: Step) {
        match step {
            Step::Brand => self.brand = None,
            Step::Model => self.model = None,
            Step::Category => self.category = None,
            Step::Year => self.year = None,
            Step::Bank => self.bank = None,
        }
    }

    /// Promote to a complete selection, or hand the partial one back
    fn resolve(self) -> Result<ResolvedSelection, Self> {
        match self {
            Selections {
                brand: Some(brand),
                model: Some(model),
                category: Some(category),
                year: Some(year),
                bank: Some(bank),
            } => Ok(ResolvedSelection {
                brand,
                model,
                category,
                year,
                bank,
            }),
            partial => Err(partial),
        }
    }
}

/// A finance selection with every field chosen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSelection {
    pub brand: Brand,
    pub model: String,
    pub category: String,
    pub year: ModelYear,
    pub bank: Bank,
}

impl From<ResolvedSelection> for Selections {
    fn from(resolved: ResolvedSelection) -> Self {
        Self {
            brand: Some(resolved.brand),
            model: Some(resolved.model),
            category: Some(resolved.category),
            year: Some(resolved.year),
            bank: Some(resolved.bank),
        }
    }
}

/// Sub-state of the finance flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinanceState {
    /// Waiting for input at `step`; every earlier step's field is set
    Choosing { step: Step, selections: Selections },
    /// Bank chosen, result shown
    Result(ResolvedSelection),
}

/// Why a transition left the state unchanged
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IgnoredTransition {
    #[error("payment method already chosen ({current})")]
    MethodAlreadyChosen { current: PaymentMethod },

    #[error("no step is awaiting input")]
    NoActiveStep,

    #[error("step {requested} is not the current step ({current})")]
    NotCurrentStep { requested: Step, current: Step },

    #[error("a {choice} value cannot be used at the {step} step")]
    WrongChoice { step: Step, choice: Step },

    #[error("nothing to go back to")]
    NothingToUndo,
}

/// Top-level wizard state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum WizardState {
    #[default]
    NoMethod,
    Cash,
    Finance(FinanceState),
}

impl WizardState {
    pub fn new() -> Self {
        Self::NoMethod
    }

    /// Name of the current state
    pub fn name(&self) -> &'static str {
        match self {
            WizardState::NoMethod => "NoMethod",
            WizardState::Cash => "Cash",
            WizardState::Finance(FinanceState::Choosing { step, .. }) => match step {
                Step::Brand => "Finance.Step0",
                Step::Model => "Finance.Step1",
                Step::Category => "Finance.Step2",
                Step::Year => "Finance.Step3",
                Step::Bank => "Finance.Step4",
            },
            WizardState::Finance(FinanceState::Result(_)) => "Finance.Result",
        }
    }

    pub fn payment_method(&self) -> Option<PaymentMethod> {
        match self {
            WizardState::NoMethod => None,
            WizardState::Cash => Some(PaymentMethod::Cash),
            WizardState::Finance(_) => Some(PaymentMethod::Finance),
        }
    }

    /// Step shown to the customer; the result view stays on the bank step
    pub fn step(&self) -> Option<Step> {
        match self {
            WizardState::Finance(FinanceState::Choosing { step, .. }) => Some(*step),
            WizardState::Finance(FinanceState::Result(_)) => Some(Step::Bank),
            _ => None,
        }
    }

    /// Step awaiting input, if any
    pub fn active_step(&self) -> Option<Step> {
        match self {
            WizardState::Finance(FinanceState::Choosing { step, .. }) => Some(*step),
            _ => None,
        }
    }

    pub fn is_result_visible(&self) -> bool {
        matches!(self, WizardState::Finance(FinanceState::Result(_)))
    }

    pub fn resolved(&self) -> Option<&ResolvedSelection> {
        match self {
            WizardState::Finance(FinanceState::Result(resolved)) => Some(resolved),
            _ => None,
        }
    }

    /// Collected fields, flattened
    pub fn selections(&self) -> Selections {
        match self {
            WizardState::Finance(FinanceState::Choosing { selections, .. }) => selections.clone(),
            WizardState::Finance(FinanceState::Result(resolved)) => resolved.clone().into(),
            _ => Selections::default(),
        }
    }

    pub fn can_go_back(&self) -> bool {
        matches!(self, WizardState::Finance(_))
    }

    pub fn check_choose_method(&self) -> Result<(), IgnoredTransition> {
        match self.payment_method() {
            None => Ok(()),
            Some(current) => Err(IgnoredTransition::MethodAlreadyChosen { current }),
        }
    }

    pub fn check_select(&self, step: Step, choice: &Choice) -> Result<(), IgnoredTransition> {
        let current = self.active_step().ok_or(IgnoredTransition::NoActiveStep)?;
        if step != current {
            return Err(IgnoredTransition::NotCurrentStep {
                requested: step,
                current,
            });
        }
        if choice.step() != step {
            return Err(IgnoredTransition::WrongChoice {
                step,
                choice: choice.step(),
            });
        }
        Ok(())
    }

    pub fn check_back(&self) -> Result<(), IgnoredTransition> {
        if self.can_go_back() {
            Ok(())
        } else {
            Err(IgnoredTransition::NothingToUndo)
        }
    }

    /// Pick cash or finance; only valid from `NoMethod`
    pub fn choose_method(self, method: PaymentMethod) -> Self {
        if self.check_choose_method().is_err() {
            return self;
        }
        match method {
            PaymentMethod::Cash => WizardState::Cash,
            PaymentMethod::Finance => WizardState::Finance(FinanceState::Choosing {
                step: Step::Brand,
                selections: Selections::default(),
            }),
        }
    }

    /// Record `choice` at `step` and advance
    ///
    /// Selecting the bank shows the result instead of advancing.
    pub fn select(self, step: Step, choice: Choice) -> Self {
        if self.check_select(step, &choice).is_err() {
            return self;
        }
        match self {
            WizardState::Finance(FinanceState::Choosing { mut selections, .. }) => {
                selections.set(choice);
                match step.next() {
                    Some(next) => WizardState::Finance(FinanceState::Choosing {
                        step: next,
                        selections,
                    }),
                    None => match selections.resolve() {
                        Ok(resolved) => WizardState::Finance(FinanceState::Result(resolved)),
                        // Unreachable while earlier fields are set; stay on the bank step
                        Err(selections) => WizardState::Finance(FinanceState::Choosing {
                            step: Step::Bank,
                            selections,
                        }),
                    },
                }
            }
            other => other,
        }
    }

    /// Undo one step
    ///
    /// - result view: hide the result and keep every field, bank included
    /// - step k > 0: clear the field of step k and move to step k - 1
    /// - step 0: drop everything and return to `NoMethod`
    /// - cash or no method: unchanged
    ///
    /// Backing out of a shown result therefore takes two calls to reach the
    /// year step: the first hides the result on the bank step, the second
    /// clears the bank and lands on step 3 with the year still set.
    pub fn back(self) -> Self {
        match self {
            WizardState::Finance(FinanceState::Result(resolved)) => {
                WizardState::Finance(FinanceState::Choosing {
                    step: Step::Bank,
                    selections: resolved.into(),
                })
            }
            WizardState::Finance(FinanceState::Choosing {
                step,
                mut selections,
            }) => match step.previous() {
                Some(previous) => {
                    selections.clear(step);
                    WizardState::Finance(FinanceState::Choosing {
                        step: previous,
                        selections,
                    })
                }
                None => WizardState::NoMethod,
            },
            other => other,
        }
    }

    /// Start over
    pub fn reset(self) -> Self {
        WizardState::NoMethod
    }
}
