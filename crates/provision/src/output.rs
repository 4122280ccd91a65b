//! Colored console output for the target and plan.

use anstream::println as aprintln;

use crate::planning::{self, ProvisionPlan};
use crate::provision::ProvisionOutcome;
use crate::schema::TableSchema;

const RESET: &str = "\x1b[0m";

/// Console tones (Tokyo Night palette).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Red,
    Green,
    Yellow,
    Blue,
    Cyan,
    Plain,
}

impl Tone {
    fn code(self) -> &'static str {
        match self {
            Tone::Red => "\x1b[38;2;247;118;142m",
            Tone::Green => "\x1b[38;2;158;206;106m",
            Tone::Yellow => "\x1b[38;2;224;175;104m",
            Tone::Blue => "\x1b[38;2;122;162;247m",
            Tone::Cyan => "\x1b[38;2;125;207;255m",
            Tone::Plain => "",
        }
    }

    /// Wraps `text` in this tone's escape codes. `anstream` strips them
    /// when stdout is not a terminal.
    pub fn paint(self, text: &str) -> String {
        match self {
            Tone::Plain => text.to_string(),
            tone => format!("{}{}{}", tone.code(), text, RESET),
        }
    }

    /// Tone for a formatted plan line, picked from its marker.
    pub fn for_plan_line(line: &str) -> Self {
        match line.trim_start().chars().next() {
            Some('+') => Tone::Green,
            Some('-') => Tone::Red,
            _ => Tone::Plain,
        }
    }
}

/// Prints the target environment and table name.
pub fn print_target(target: &str, table_name: &str) {
    aprintln!("{} {}", Tone::Blue.paint("Target:"), target);
    aprintln!("{} {}", Tone::Blue.paint("Table:"), table_name);
    aprintln!();
}

/// Prints the plan, one colored line per change.
pub fn print_plan(plan: &ProvisionPlan, schema: &TableSchema) {
    aprintln!("{}", Tone::Cyan.paint("Provision Plan:"));
    for line in planning::format_plan(plan, schema) {
        aprintln!("  {}", Tone::for_plan_line(&line).paint(&line));
    }
    aprintln!();
}

/// Prints a one-line summary of how the run ended.
pub fn print_outcome(outcome: &ProvisionOutcome) {
    let (tone, text) = match outcome {
        ProvisionOutcome::ListFailed(_) => (Tone::Red, "Could not list tables.".to_string()),
        ProvisionOutcome::Planned(_) => (Tone::Yellow, "Dry run, nothing applied.".to_string()),
        ProvisionOutcome::DeleteFailed(_) => (
            Tone::Red,
            "Could not delete table, creation skipped.".to_string(),
        ),
        ProvisionOutcome::CreateRequested { replaced } => (
            Tone::Green,
            format!(
                "Table {} requested.",
                if *replaced { "recreation" } else { "creation" }
            ),
        ),
        ProvisionOutcome::CreateFailed { error, .. } => (Tone::Red, error.to_string()),
    };
    aprintln!("{}", tone.paint(&text));
}
