//! Schedule table parsing.
//!
//! # Table format
//!
//! One row per transport request:
//!
//! ```csv
//! # time,origin,destination,priority
//! 00:05,DOCK_1,STORE_A,std
//! 00:30,DOCK_2,STORE_B,urgent-3
//! ```
//!
//! Blank lines and lines starting with `#` are ignored.  Rows with fewer
//! than four fields and rows whose time field fails to parse are **skipped
//! with a warning** — a single bad row never aborts the load.  Extra fields
//! beyond the fourth are ignored.
//!
//! # Time modes
//!
//! | Mode        | Format              | Meaning                               |
//! |-------------|---------------------|---------------------------------------|
//! | `Elapsed`   | `MM:SS`             | offset in seconds from sequence start |
//! | `TimeOfDay` | `HH:MM` / `HH:MM:SS`| absolute clock time                   |
//!
//! In time-of-day mode the smallest absolute time among the valid rows
//! becomes the *anchor*; every row resolves to
//! `(absolute − anchor) + day_offset`, where `day_offset` grows by 86 400 s
//! each time a row's absolute time drops below its predecessor's in file
//! order (midnight rollover).

use std::io::Read;

use tracing::warn;

use crate::event::ScheduledEvent;
use crate::{SequenceError, SequenceResult};

const SECS_PER_DAY: f64 = 86_400.0;

// ── Configuration ─────────────────────────────────────────────────────────────

/// How the schedule's time column is interpreted.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum TimeMode {
    /// `MM:SS` offsets from sequence start.
    #[default]
    Elapsed,
    /// `HH:MM` or `HH:MM:SS` clock times, anchored to the earliest row.
    TimeOfDay,
}

/// Clock configuration.
#[derive(Clone, Debug)]
pub struct SequencerParams {
    pub time_mode: TimeMode,

    /// Fixed simulated-time increment consumed per micro-step.
    pub micro_step_secs: f64,

    /// Livelock guard: at most this many micro-steps execute per tick; any
    /// remaining budget carries to the next tick.
    pub max_steps_per_tick: u32,

    /// Simulated seconds of dead time charged before the first micro-step.
    pub start_delay_secs: f64,
}

impl Default for SequencerParams {
    fn default() -> Self {
        Self {
            time_mode:          TimeMode::Elapsed,
            micro_step_secs:    0.1,
            max_steps_per_tick: 600,
            start_delay_secs:   0.0,
        }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Parse a schedule table from any `Read` source.
///
/// Returns the loaded events sorted ascending by resolved firing time with
/// dense ids assigned, or [`SequenceError::NoEvents`] if nothing survived.
pub fn load_events_reader<R: Read>(
    reader: R,
    mode: TimeMode,
) -> SequenceResult<Vec<ScheduledEvent>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .comment(Some(b'#'))
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    // (absolute-or-elapsed secs, origin, destination, tag) in file order.
    let mut rows: Vec<(f64, String, String, String)> = Vec::new();

    for (line, result) in csv_reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(line, error = %e, "skipping unreadable schedule row");
                continue;
            }
        };
        if record.iter().all(str::is_empty) {
            continue;
        }
        if record.len() < 4 {
            warn!(line, fields = record.len(), "skipping short schedule row");
            continue;
        }

        let secs = match parse_time(&record[0], mode) {
            Some(s) => s,
            None => {
                warn!(line, time = &record[0], "skipping row with malformed time");
                continue;
            }
        };
        rows.push((
            secs,
            record[1].to_owned(),
            record[2].to_owned(),
            record[3].to_owned(),
        ));
    }

    if rows.is_empty() {
        return Err(SequenceError::NoEvents);
    }

    let resolved = match mode {
        TimeMode::Elapsed   => rows,
        TimeMode::TimeOfDay => resolve_time_of_day(rows),
    };

    Ok(sort_and_number(resolved))
}

/// Convert absolute clock times to offsets from the anchor, accumulating a
/// day offset at each midnight rollover in file order.
fn resolve_time_of_day(
    rows: Vec<(f64, String, String, String)>,
) -> Vec<(f64, String, String, String)> {
    let anchor = rows.iter().map(|r| r.0).fold(f64::INFINITY, f64::min);

    let mut day_offset = 0.0;
    let mut prev_abs: Option<f64> = None;

    rows.into_iter()
        .map(|(abs, origin, dest, tag)| {
            if let Some(prev) = prev_abs {
                if abs < prev {
                    day_offset += SECS_PER_DAY;
                }
            }
            prev_abs = Some(abs);
            ((abs - anchor) + day_offset, origin, dest, tag)
        })
        .collect()
}

/// Stable-sort by firing time and assign dense zero-padded ids.
///
/// Stability makes equal-time rows keep file order, so reloading identical
/// input reproduces identical ids.
fn sort_and_number(mut rows: Vec<(f64, String, String, String)>) -> Vec<ScheduledEvent> {
    rows.sort_by(|a, b| a.0.total_cmp(&b.0));

    rows.into_iter()
        .enumerate()
        .map(|(i, (firing_secs, origin_code, destination_code, priority_tag))| ScheduledEvent {
            id: format!("id_{i:03}"),
            firing_secs,
            origin_code,
            destination_code,
            priority_tag,
        })
        .collect()
}

// ── Time strings ──────────────────────────────────────────────────────────────

/// Parse a time field under the given mode; `None` on any malformation.
pub fn parse_time(text: &str, mode: TimeMode) -> Option<f64> {
    match mode {
        TimeMode::Elapsed   => parse_elapsed(text),
        TimeMode::TimeOfDay => parse_time_of_day(text),
    }
}

/// `MM:SS` — minutes unbounded, seconds below 60.
fn parse_elapsed(text: &str) -> Option<f64> {
    let (m, s) = text.split_once(':')?;
    let minutes: u32 = m.parse().ok()?;
    let seconds: u32 = s.parse().ok()?;
    if seconds >= 60 {
        return None;
    }
    Some(f64::from(minutes) * 60.0 + f64::from(seconds))
}

/// `HH:MM` or `HH:MM:SS` — a clock time within one day.
fn parse_time_of_day(text: &str) -> Option<f64> {
    let mut parts = text.split(':');
    let hours: u32 = parts.next()?.parse().ok()?;
    let minutes: u32 = parts.next()?.parse().ok()?;
    let seconds: u32 = match parts.next() {
        Some(s) => s.parse().ok()?,
        None => 0,
    };
    if parts.next().is_some() || hours >= 24 || minutes >= 60 || seconds >= 60 {
        return None;
    }
    Some(f64::from(hours) * 3_600.0 + f64::from(minutes) * 60.0 + f64::from(seconds))
}
