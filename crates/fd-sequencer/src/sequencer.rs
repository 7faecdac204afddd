//! The `Sequencer` — load, begin, tick, stop, reload.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use fd_core::time::format_hms;

use crate::event::ScheduledEvent;
use crate::observer::SequenceObserver;
use crate::parse::{self, SequencerParams};
use crate::{SequenceError, SequenceResult};

/// Retained so `reload()` can re-read the same input.
#[derive(Clone, Debug)]
enum ScheduleSource {
    Path(PathBuf),
    Text(String),
}

/// The deterministic event clock.
///
/// Owns the loaded schedule and the integration state (`sim_time`, budget,
/// event cursor).  Time advances only inside [`tick`](Self::tick); between
/// ticks the clock is inert.
pub struct Sequencer {
    params: SequencerParams,
    source: Option<ScheduleSource>,
    events: Vec<ScheduledEvent>,

    sim_time_secs: f64,
    /// Unconsumed tick budget; negative while the start delay is charged off.
    budget_secs: f64,
    /// Index of the next event to fire.  Only advances.
    cursor: usize,
    running: bool,
}

impl Sequencer {
    pub fn new(params: SequencerParams) -> Self {
        Self {
            params,
            source: None,
            events: Vec::new(),
            sim_time_secs: 0.0,
            budget_secs: 0.0,
            cursor: 0,
            running: false,
        }
    }

    // ── Introspection ─────────────────────────────────────────────────────

    pub fn is_loaded(&self) -> bool {
        !self.events.is_empty()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Simulated seconds since `begin()`.
    pub fn sim_time_secs(&self) -> f64 {
        self.sim_time_secs
    }

    /// The loaded schedule, sorted by firing time.
    pub fn events(&self) -> &[ScheduledEvent] {
        &self.events
    }

    /// Events not yet fired.
    pub fn remaining(&self) -> usize {
        self.events.len() - self.cursor
    }

    pub fn params(&self) -> &SequencerParams {
        &self.params
    }

    // ── Loading ───────────────────────────────────────────────────────────

    /// Load a schedule file.  Returns the number of events loaded.
    ///
    /// On any error the clock ends up unloaded — a failed load never leaves
    /// a partial schedule behind.
    pub fn load_path(&mut self, path: &Path) -> SequenceResult<usize> {
        let source = ScheduleSource::Path(path.to_path_buf());
        let result = std::fs::File::open(path)
            .map_err(SequenceError::Io)
            .and_then(|f| parse::load_events_reader(f, self.params.time_mode));
        self.install(result, source)
    }

    /// Load a schedule from an in-memory table (tests, embedded scenarios).
    pub fn load_str(&mut self, text: &str) -> SequenceResult<usize> {
        let source = ScheduleSource::Text(text.to_owned());
        let result =
            parse::load_events_reader(std::io::Cursor::new(text), self.params.time_mode);
        self.install(result, source)
    }

    fn install(
        &mut self,
        result: SequenceResult<Vec<ScheduledEvent>>,
        source: ScheduleSource,
    ) -> SequenceResult<usize> {
        self.running = false;
        self.sim_time_secs = 0.0;
        self.budget_secs = 0.0;
        self.cursor = 0;
        match result {
            Ok(events) => {
                debug!(count = events.len(), "schedule loaded");
                self.events = events;
                self.source = Some(source);
                Ok(self.events.len())
            }
            Err(e) => {
                self.events.clear();
                Err(e)
            }
        }
    }

    // ── Run control ───────────────────────────────────────────────────────

    /// Reset simulated time to zero and start firing from the first event.
    ///
    /// The configured start delay is charged as negative budget, so the
    /// first micro-step is consumed only once a full delay's worth of tick
    /// budget has accumulated.
    pub fn begin(&mut self) -> SequenceResult<()> {
        if !self.is_loaded() {
            return Err(SequenceError::NotLoaded);
        }
        self.sim_time_secs = 0.0;
        self.budget_secs = -self.params.start_delay_secs;
        self.cursor = 0;
        self.running = true;
        info!(
            events = self.events.len(),
            start_delay_secs = self.params.start_delay_secs,
            "sequencer started"
        );
        Ok(())
    }

    /// Idempotent; a stopped clock ignores `tick()`.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Re-read the retained source and start over.
    ///
    /// If the clock was running it is started again; otherwise it stays
    /// stopped.  Reloading unchanged input reproduces an identical event
    /// list with identical ids.
    pub fn reload(&mut self) -> SequenceResult<usize> {
        let source = self.source.clone().ok_or(SequenceError::NotLoaded)?;
        let was_running = self.running;
        let count = match &source {
            ScheduleSource::Path(p) => self.load_path(p)?,
            ScheduleSource::Text(t) => {
                let t = t.clone();
                self.load_str(&t)?
            }
        };
        if was_running {
            self.begin()?;
        }
        Ok(count)
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// Advance simulated time by up to `tick_secs`, firing due events.
    ///
    /// The budget is integrated in fixed micro-steps; each micro-step fires
    /// every event whose firing time has been reached, in ascending id
    /// order, synchronously, before the next micro-step executes.  At most
    /// `max_steps_per_tick` micro-steps run per call — beyond that the
    /// remainder carries over and one warning is emitted.  Once the last
    /// event has fired the clock stops.
    ///
    /// Returns the number of events fired during this tick.
    pub fn tick(
        &mut self,
        tick_secs: f64,
        subscribers: &mut [&mut dyn SequenceObserver],
    ) -> usize {
        if !self.running {
            return 0;
        }
        self.budget_secs += tick_secs;

        let step = self.params.micro_step_secs;
        let mut steps = 0u32;
        let mut fired = 0usize;

        while self.running && self.budget_secs >= step {
            if steps >= self.params.max_steps_per_tick {
                warn!(
                    deferred_secs = self.budget_secs,
                    steps, "micro-step cap hit; deferring remainder to next tick"
                );
                break;
            }
            self.budget_secs -= step;
            self.sim_time_secs += step;
            steps += 1;

            fired += self.fire_due(subscribers);

            if self.cursor >= self.events.len() {
                info!(sim_time = %format_hms(self.sim_time_secs), "schedule exhausted; sequencer stopped");
                self.running = false;
            }
        }
        fired
    }

    /// Fire every event due at the current simulated time.
    fn fire_due(&mut self, subscribers: &mut [&mut dyn SequenceObserver]) -> usize {
        let mut fired = 0;
        while self.cursor < self.events.len()
            && self.events[self.cursor].firing_secs <= self.sim_time_secs
        {
            let release = self.events[self.cursor].release();
            self.cursor += 1;
            fired += 1;

            info!(
                "[Sequencer] New Task, {}, {}, {}, {}",
                release.id, release.origin_code, release.destination_code, release.priority_tag
            );

            for subscriber in subscribers.iter_mut() {
                if let Err(e) = subscriber.on_task(&release) {
                    warn!(task = %release.id, error = %e, "subscriber failed on task release");
                }
            }
        }
        fired
    }
}
