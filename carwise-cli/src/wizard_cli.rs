//! Terminal driver for the finance wizard
//!
//! Interactive mode reads one command per line: an option number or label,
//! `b` to go back, `r` to restart, `q` to quit. Scripted mode applies a list
//! of labels (plus `back` and `restart`) and prints where it ended up.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::io::{BufRead, Write};
use tabled::{settings::Style, Table, Tabled};

use carwise_core::{PaymentMethod, ResultView, WizardSession, WizardSnapshot, WizardState};

const METHODS: [PaymentMethod; 2] = [PaymentMethod::Cash, PaymentMethod::Finance];

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Back,
    Restart,
    Quit,
    /// Option number or label, resolved against the current step
    Pick(String),
}

pub fn parse_input(line: &str) -> Option<Input> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let input = match trimmed.to_ascii_lowercase().as_str() {
        "b" | "back" => Input::Back,
        "r" | "restart" => Input::Restart,
        "q" | "quit" => Input::Quit,
        _ => Input::Pick(trimmed.to_string()),
    };
    Some(input)
}

/// Apply a pick; numbers within the option list select by position
fn pick(session: &mut WizardSession, value: &str) -> bool {
    if matches!(session.state(), WizardState::NoMethod) {
        let method = match value.parse::<usize>() {
            Ok(n) if (1..=METHODS.len()).contains(&n) => Some(METHODS[n - 1]),
            _ => PaymentMethod::parse(value),
        };
        return method.is_some_and(|method| session.choose_method(method));
    }

    let Some(options) = session.options() else {
        return false;
    };

    match value.parse::<usize>() {
        Ok(n) if (1..=options.choices.len()).contains(&n) => session.select_index(n - 1),
        _ => session.select_label(value),
    }
}

/// Returns whether the state changed
pub fn apply_input(session: &mut WizardSession, input: &Input) -> bool {
    match input {
        Input::Back => session.back(),
        Input::Restart => {
            session.reset();
            true
        }
        Input::Quit => false,
        Input::Pick(value) => pick(session, value),
    }
}

#[derive(Tabled)]
struct DetailRow {
    #[tabled(rename = "Field")]
    label: String,
    #[tabled(rename = "Value")]
    value: String,
}

pub fn render_result<W: Write>(view: &ResultView, out: &mut W) -> Result<()> {
    writeln!(out, "{}", view.headline())?;

    let rows: Vec<DetailRow> = view
        .detail_rows()
        .into_iter()
        .map(|(label, value)| DetailRow {
            label: label.to_string(),
            value,
        })
        .collect();
    writeln!(out, "{}", Table::new(rows).with(Style::rounded()))?;

    match &view.vehicle {
        Some(vehicle) => writeln!(out, "Matched catalog record {}", vehicle.id)?,
        None => writeln!(out, "No catalog record matches this selection")?,
    }
    if view.degraded {
        writeln!(out, "(matched against offline data)")?;
    }
    Ok(())
}

fn render_prompt<W: Write>(session: &WizardSession, out: &mut W) -> Result<()> {
    match session.state() {
        WizardState::NoMethod => {
            writeln!(out, "\nHow will the customer pay?")?;
            for (i, method) in METHODS.iter().enumerate() {
                writeln!(out, "  {}) {}", i + 1, method)?;
            }
            writeln!(out, "[q] quit")?;
        }
        WizardState::Cash => {
            writeln!(out, "\nCash purchase selected. A sales advisor will take it from here.")?;
            writeln!(out, "[r] restart  [q] quit")?;
        }
        WizardState::Finance(_) => {
            if let Some(view) = session.result_view() {
                writeln!(out)?;
                render_result(&view, out)?;
                writeln!(out, "[b] back  [r] restart  [q] quit")?;
                return Ok(());
            }

            let Some(options) = session.options() else {
                return Ok(());
            };
            writeln!(
                out,
                "\nStep {}/5: {}",
                options.step.index() + 1,
                options.step.title()
            )?;
            for (i, label) in options.labels().iter().enumerate() {
                writeln!(out, "  {}) {}", i + 1, label)?;
            }
            writeln!(out, "[b] back  [q] quit")?;
        }
    }
    Ok(())
}

/// Prompt on `out` and read commands from `input` until quit or end of input
pub fn run_interactive<R: BufRead, W: Write>(
    session: &mut WizardSession,
    mut input: R,
    out: &mut W,
) -> Result<()> {
    if session.is_degraded() {
        writeln!(out, "Working from offline catalog data.")?;
    }

    loop {
        render_prompt(session, out)?;
        write!(out, "> ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line).context("Failed to read input")? == 0 {
            break;
        }

        match parse_input(&line) {
            None => continue,
            Some(Input::Quit) => break,
            Some(command) => {
                if !apply_input(session, &command) {
                    writeln!(out, "Not available here: {}", line.trim())?;
                }
            }
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct ScriptOutcome {
    wizard: WizardSnapshot,
    result: Option<ResultView>,
}

/// Apply `choices` in order, failing on the first one that is not an option
pub fn run_scripted<W: Write>(
    session: &mut WizardSession,
    choices: &[String],
    json: bool,
    out: &mut W,
) -> Result<()> {
    for choice in choices {
        let Some(command) = parse_input(choice) else {
            continue;
        };

        // Back and restart never fail; an ignored back is not an error
        if command == Input::Quit {
            break;
        }
        if apply_input(session, &command) || matches!(command, Input::Back) {
            continue;
        }

        let available = match session.options() {
            Some(options) => options.labels().join(", "),
            None if matches!(session.state(), WizardState::NoMethod) => "cash, finance".to_string(),
            None => "back, restart".to_string(),
        };
        bail!(
            "'{}' is not a valid choice in state {} (available: {})",
            choice,
            session.state().name(),
            available
        );
    }

    let outcome = ScriptOutcome {
        wizard: session.snapshot(),
        result: session.result_view(),
    };

    if json {
        let output =
            serde_json::to_string_pretty(&outcome).context("Failed to serialize wizard state")?;
        writeln!(out, "{output}")?;
        return Ok(());
    }

    let snapshot = &outcome.wizard;
    writeln!(
        out,
        "State: {} (step {}, method {})",
        snapshot.state,
        snapshot.step_index,
        snapshot
            .payment_method
            .map(|m| m.to_string())
            .unwrap_or_else(|| "-".to_string())
    )?;
    if let Some(view) = &outcome.result {
        render_result(view, out)?;
    }
    Ok(())
}
