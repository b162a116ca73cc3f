// src/progress.rs

//! Progress accounting for long-running transfers: percentage, ETA and
//! speed strings. Pure computation — rendering to a terminal is the
//! caller's business — with an injectable clock so it can be tested
//! deterministically.

/// Seconds since some fixed origin.
type Clock = Box<dyn FnMut() -> f64>;

fn system_clock() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Tracks progress of a value from `min` towards an optional `max`.
pub struct Progress {
    min: u64,
    cur: u64,
    max: Option<u64>,
    started: Option<f64>,
    elapsed: f64,
    done: bool,
    clock: Clock,
}

impl Progress {
    pub fn new(min: u64, max: Option<u64>) -> Self {
        Self::with_clock(min, max, Box::new(system_clock))
    }

    /// As [`new`](Self::new), with a caller-supplied clock returning
    /// seconds.
    pub fn with_clock(min: u64, max: Option<u64>, clock: Clock) -> Self {
        Self {
            min,
            cur: min,
            max,
            started: None,
            elapsed: 0.0,
            done: false,
            clock,
        }
    }

    /// Begin timing from the current clock value.
    pub fn start(&mut self) {
        self.cur = self.min;
        self.started = Some((self.clock)());
    }

    /// Record the current value and refresh elapsed time.
    pub fn update(&mut self, curval: u64) {
        let curval = curval.max(self.min);
        self.cur = match self.max {
            Some(max) => curval.min(max),
            None => curval,
        };
        let now = (self.clock)();
        let started = *self.started.get_or_insert(now);
        self.elapsed = now - started;
    }

    pub fn increment(&mut self, incr: u64) {
        self.update(self.cur + incr);
    }

    /// Snap to the maximum (when known) and freeze the elapsed time.
    pub fn stop(&mut self) {
        if let Some(max) = self.max {
            self.cur = max;
        }
        if let Some(started) = self.started {
            self.elapsed = (self.clock)() - started;
        }
        self.done = true;
    }

    pub fn value(&self) -> u64 {
        self.cur
    }

    /// `" 42 %"` style percentage, `" ?? %"` when the maximum is unknown.
    pub fn percentage(&self) -> String {
        if self.done {
            return "100 %".to_string();
        }
        match self.max {
            None => " ?? %".to_string(),
            Some(max) if max == self.min => "100 %".to_string(),
            Some(max) => {
                let pct = 100.0 * (self.cur - self.min) as f64 / (max - self.min) as f64;
                format!("{:>3} %", pct as u64)
            }
        }
    }

    /// `"ETA : HH:MM:SS"` while running, `"Done: HH:MM:SS"` (total elapsed)
    /// once stopped.
    pub fn eta(&self) -> String {
        if self.done {
            return format!("Done: {}", format_duration(self.elapsed));
        }
        let remaining = match self.max {
            None => -1.0,
            Some(_) if self.elapsed == 0.0 || self.cur == self.min => 0.0,
            Some(max) => {
                (max - self.cur) as f64 / (self.cur - self.min) as f64 * self.elapsed
            }
        };
        format!("ETA : {}", format_duration(remaining))
    }

    /// Transfer rate derived from bytes per second, scaled to the nearest
    /// unit: `"19 KB/s"`.
    pub fn speed(&self) -> String {
        let mut rate = if self.elapsed == 0.0 {
            0.0
        } else {
            (self.cur - self.min) as f64 / self.elapsed
        };
        let mut unit = "";
        for candidate in ["", "K", "M", "G", "T", "P"] {
            unit = candidate;
            if rate < 1000.0 {
                break;
            }
            rate /= 1000.0;
        }
        format!("{} {}B/s", rate as u64, unit)
    }
}

fn format_duration(duration: f64) -> String {
    if duration < 0.0 {
        return "??:??:??".to_string();
    }
    let secs = duration as u64;
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
