//! Budget input: suffix parsing and the interactive prompt.

use dialoguer::Input;
use owo_colors::{OwoColorize, Stream};
use tracing::debug;

use crate::types::TraderError;

/// Largest accepted budget. Anything above this is a typo, not a stack.
const MAX_GOLD: u64 = 1 << 62;

/// Parse a gold amount with an optional `k`/`m`/`b` suffix.
///
/// The mantissa may be fractional when a suffix is present ("2.5m" →
/// 2,500,000); a bare number must be a whole number of gp. The result
/// must be positive.
pub fn parse_gold(input: &str) -> Result<u64, TraderError> {
    let cleaned = input.trim().to_lowercase();
    let invalid = || TraderError::Input(input.trim().to_string());

    if cleaned.is_empty() {
        return Err(invalid());
    }

    let (mantissa, multiplier) = match cleaned.as_bytes()[cleaned.len() - 1] {
        b'k' => (&cleaned[..cleaned.len() - 1], 1_000.0),
        b'm' => (&cleaned[..cleaned.len() - 1], 1_000_000.0),
        b'b' => (&cleaned[..cleaned.len() - 1], 1_000_000_000.0),
        _ => {
            // No suffix: whole gp only
            let value: u64 = cleaned.parse().map_err(|_| invalid())?;
            if value == 0 || value > MAX_GOLD {
                return Err(invalid());
            }
            return Ok(value);
        }
    };

    let value: f64 = mantissa.parse().map_err(|_| invalid())?;
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid());
    }

    let gold = value * multiplier;
    if gold > MAX_GOLD as f64 {
        return Err(invalid());
    }

    // Truncate fractional gp first: a sub-1-gp input like "0.0001k"
    // rounds down to zero and must be rejected like any other
    // non-positive budget.
    let gold = gold as u64;
    if gold == 0 {
        return Err(invalid());
    }

    Ok(gold)
}

/// Prompt until the user enters a parseable budget.
///
/// Returns `None` when the prompt is interrupted or stdin closes —
/// the caller treats that as a clean exit.
pub fn prompt_budget() -> Option<u64> {
    loop {
        let raw: String = match Input::new()
            .with_prompt("How much gp do you have?")
            .allow_empty(true)
            .interact_text()
        {
            Ok(s) => s,
            Err(e) => {
                debug!(error = %e, "Prompt closed");
                return None;
            }
        };

        match parse_gold(&raw) {
            Ok(budget) => return Some(budget),
            Err(e) => {
                eprintln!(
                    "{}",
                    format!("{e}. Use 'k' for thousand, 'm' for million, or 'b' for billion.")
                        .if_supports_color(Stream::Stderr, |t| t.red())
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
