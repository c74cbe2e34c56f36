//! End-to-end route runtime estimation.
//!
//! Recorded per-stop timing is used where it is sane; otherwise each leg is
//! estimated from its haversine length over a time-of-day speed profile
//! (slower during the morning and evening peaks). A reference clock
//! advances across legs so long runs drift into the right profile window.

use std::sync::Arc;

use chrono::{NaiveTime, Timelike};

use crate::models::types::Stop;
use crate::spatial::queries::haversine_meters;

/// Dwell applied when a stop has no usable recorded dwell time.
pub const DEFAULT_DWELL_SECONDS: f64 = 30.0;

const MAX_DWELL_SECONDS: f64 = 300.0;
const MAX_LEG_SECONDS: f64 = 1800.0;
const PEAK_SPEED_KMH: f64 = 16.0;
const OFF_PEAK_SPEED_KMH: f64 = 22.0;

/// Total runtime in seconds for a route departing at `departure`, or `None`
/// for a route without stops.
///
/// Stops are ordered by `sequence` before estimation; the first stop only
/// contributes its dwell.
pub fn estimate_runtime(stops: &[Arc<Stop>], departure: NaiveTime) -> Option<f64> {
    if stops.is_empty() {
        return None;
    }

    let mut ordered: Vec<&Arc<Stop>> = stops.iter().collect();
    ordered.sort_by_key(|stop| stop.sequence);

    let mut total = 0.0;
    let mut clock_minute = departure.hour() * 60 + departure.minute();

    for (index, stop) in ordered.iter().enumerate() {
        let dwell = normalize_dwell(stop.dwell_seconds);
        if index == 0 {
            total += dwell;
            continue;
        }

        let leg = sensible_travel_time(stop.travel_seconds).unwrap_or_else(|| {
            let meters = haversine_meters(ordered[index - 1].position, stop.position);
            let speed_kmh = speed_for_minute(clock_minute);
            ((meters / 1000.0) / speed_kmh * 3600.0).round()
        });

        total += leg + dwell;
        clock_minute += ((leg + dwell) / 60.0).round() as u32;
    }

    Some(total)
}

/// Average speed profile: 07:00-09:00 and 18:00-20:00 are peak.
fn speed_for_minute(minute_of_day: u32) -> f64 {
    let minute = minute_of_day % (24 * 60);
    let peak = (7 * 60..9 * 60).contains(&minute) || (18 * 60..20 * 60).contains(&minute);
    if peak {
        PEAK_SPEED_KMH
    } else {
        OFF_PEAK_SPEED_KMH
    }
}

fn normalize_dwell(dwell_seconds: Option<f64>) -> f64 {
    match dwell_seconds {
        Some(dwell) if dwell.is_finite() && (0.0..=MAX_DWELL_SECONDS).contains(&dwell) => {
            dwell.round()
        }
        _ => DEFAULT_DWELL_SECONDS,
    }
}

fn sensible_travel_time(travel_seconds: Option<f64>) -> Option<f64> {
    travel_seconds.filter(|leg| leg.is_finite() && (0.0..=MAX_LEG_SECONDS).contains(leg))
}
