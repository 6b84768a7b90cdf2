//! Dashboard statistics derivation.
//!
//! The upstream dashboard endpoint returns partial data for some contracts:
//! productive/idle durations may be absent or zero, and the average may be
//! missing. [`derive_stats`] normalizes any such payload into a complete
//! [`ProductionStats`] record using fallback arithmetic over the hourly
//! series. Pure: same payload in, bit-identical record out. Malformed fields
//! degrade to their zero defaults; this function never fails.

use crate::types::{DashboardResponse, HourlyPoint, ProductionStats, RawDuration};

/// Convert an upstream duration value to total minutes.
///
/// Accepts a decimal number of hours or a clock-style `H:MM`/`HH:MM` string.
/// Absent, negative, non-finite, or unparseable values count as 0.
fn duration_minutes(raw: Option<&RawDuration>) -> u64 {
    match raw {
        None => 0,
        Some(RawDuration::Hours(h)) => {
            if h.is_finite() && *h > 0.0 {
                (h * 60.0).round() as u64
            } else {
                0
            }
        }
        Some(RawDuration::Clock(text)) => parse_clock_minutes(text),
    }
}

fn parse_clock_minutes(text: &str) -> u64 {
    let Some((hours, minutes)) = text.trim().split_once(':') else {
        // A bare number of hours without minutes still parses.
        return text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|h| h.is_finite() && *h > 0.0)
            .map(|h| (h * 60.0).round() as u64)
            .unwrap_or(0);
    };
    let (Ok(h), Ok(m)) = (hours.parse::<u64>(), minutes.parse::<u64>()) else {
        return 0;
    };
    h * 60 + m
}

/// Format minutes as a clock-style display string (`H:MM`).
fn format_clock(minutes: u64) -> String {
    format!("{}:{:02}", minutes / 60, minutes % 60)
}

/// Derive a complete statistics record from a possibly-incomplete payload.
pub fn derive_stats(raw: &DashboardResponse) -> ProductionStats {
    let series = &raw.total_produzido_hora;
    let hours_with_production = series.iter().filter(|e| e.valor1 > 0.0).count() as u64;
    let hours_with_activity = series
        .iter()
        .filter(|e| e.valor1 > 0.0 || e.valor2 > 0.0)
        .count() as u64;

    // Contracts without upstream duration figures report zero or nothing;
    // count non-zero production hours as one full hour each.
    let mut productive_minutes = duration_minutes(raw.hora_produtiva.as_ref());
    if productive_minutes == 0 {
        productive_minutes = hours_with_production * 60;
    }

    let mut idle_minutes = duration_minutes(raw.hora_ociosa.as_ref());
    if idle_minutes == 0 {
        idle_minutes = hours_with_activity.saturating_sub(hours_with_production) * 60;
    }

    let operation_hours = format!(
        "{:.1}",
        (productive_minutes + idle_minutes) as f64 / 60.0
    );

    let total_produced = raw
        .total_produzido
        .as_ref()
        .map(|t| t.total)
        .filter(|t| t.is_finite() && *t > 0.0)
        .unwrap_or(0.0);

    let avg_production = match raw.media_hora.filter(|m| m.is_finite() && *m > 0.0) {
        Some(upstream) => upstream,
        None if total_produced > 0.0 && productive_minutes > 0 => {
            (total_produced / (productive_minutes as f64 / 60.0)).round()
        }
        None => {
            let positive: Vec<f64> = series
                .iter()
                .map(|e| e.valor1)
                .filter(|v| *v > 0.0)
                .collect();
            if positive.is_empty() {
                0.0
            } else {
                (positive.iter().sum::<f64>() / positive.len() as f64).round()
            }
        }
    };

    let hourly_production = series
        .iter()
        .map(|e| HourlyPoint {
            hour: format!("{}:00", e.data_hora),
            value: e.valor1.max(0.0),
        })
        .collect();

    ProductionStats {
        operation_hours,
        productive_hours: format_clock(productive_minutes),
        avg_production,
        total_produced,
        hourly_production,
    }
}
