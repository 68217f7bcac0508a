//! Line loop: one snapshot in, one action token out.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use combat_ai::{Action, CombatAi, RandomSource};

/// Counters reported when the input is exhausted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub decisions: u64,
    pub idle: u64,
    /// Blank lines, which produce no output.
    pub skipped: u64,
}

/// Decides an action for every non-blank input line and writes its token.
///
/// Unparsable lines still produce `idle`; only I/O failures abort the loop.
pub fn run<R: BufRead, W: Write>(
    ai: &CombatAi,
    hint: &str,
    rng: &mut dyn RandomSource,
    input: R,
    mut output: W,
) -> Result<Stats> {
    let mut stats = Stats::default();

    for (index, line) in input.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read input line {}", index + 1))?;
        if line.trim().is_empty() {
            stats.skipped += 1;
            continue;
        }

        let action = ai.decide_with(hint, &line, rng);
        stats.decisions += 1;
        if action == Action::Idle {
            stats.idle += 1;
        }

        writeln!(output, "{action}").context("Failed to write action")?;
        // Engines wait for each answer before sending the next tick.
        output.flush().context("Failed to flush output")?;
    }

    Ok(stats)
}
