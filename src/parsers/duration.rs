//! Free-text duration recognition for voice and shortcut style input.
//!
//! This grammar is deliberately looser than the strict
//! [`ValueFormat::Duration`](crate::types::ValueFormat) parser: it serves
//! free-form spoken text, so "1.5 hours", "90 min walk", and "2:30" all
//! resolve to minutes. Patterns are tried in a fixed priority order and
//! the first match wins.

use regex::Regex;

/// Parse arbitrary text to a duration in minutes.
///
/// Accepted, in priority order:
/// 1. "N hours \[and\] M minutes" (hour/hr/h, minute/min/m, fractional
///    numbers allowed, minutes clause optional)
/// 2. "N minutes" (min/m)
/// 3. "N seconds" (sec/s) — converted to minutes
/// 4. "HH:MM"
/// 5. a bare number, taken as minutes
///
/// Returns `None` when nothing matches.
pub fn parse_duration_text(input: &str) -> Option<f64> {
    let input = input.trim().to_lowercase();
    if input.is_empty() {
        return None;
    }

    const HOURS_MINUTES: &str =
        r"(\d+(?:\.\d+)?)\s*(?:hours?|hrs?|h)(?:\s+(?:and\s+)?(\d+(?:\.\d+)?)\s*(?:minutes?|mins?|m))?";
    if let Some((hours, minutes)) = capture_numbers(&input, HOURS_MINUTES) {
        return Some(hours * 60.0 + minutes.unwrap_or(0.0));
    }

    const MINUTES: &str = r"(\d+(?:\.\d+)?)\s*(?:minutes?|mins?|m)";
    if let Some((minutes, _)) = capture_numbers(&input, MINUTES) {
        return Some(minutes);
    }

    const SECONDS: &str = r"(\d+(?:\.\d+)?)\s*(?:seconds?|secs?|s)";
    if let Some((seconds, _)) = capture_numbers(&input, SECONDS) {
        return Some(seconds / 60.0);
    }

    if input.contains(':') {
        let parts: Vec<&str> = input.split(':').collect();
        if parts.len() == 2 {
            if let (Ok(hours), Ok(minutes)) = (parts[0].parse::<f64>(), parts[1].parse::<f64>()) {
                return Some(hours * 60.0 + minutes);
            }
        }
        return None;
    }

    input.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// First regex match in `input`: capture group 1 as a number, group 2 as an
/// optional second number.
fn capture_numbers(input: &str, pattern: &str) -> Option<(f64, Option<f64>)> {
    let re = Regex::new(pattern).expect("valid regex");
    let caps = re.captures(input)?;
    let first: f64 = caps.get(1)?.as_str().parse().ok()?;
    let second = caps.get(2).and_then(|m| m.as_str().parse().ok());
    Some((first, second))
}
