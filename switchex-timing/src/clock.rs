use chrono::{DateTime, SecondsFormat, Utc};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Wall-clock source for trial timestamps, in Unix milliseconds
pub trait Clock: Clone + Send + Sync {
    fn now_ms(&self) -> i64;

    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.now_ms()).unwrap_or_default()
    }

    /// `2026-03-01T09:30:00.125Z`
    fn iso_timestamp(&self) -> String {
        self.now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// `2026-03-01`, used in export file names
    fn date_stamp(&self) -> String {
        self.now().format("%Y-%m-%d").to_string()
    }

    /// Milliseconds since `earlier`, never negative
    fn elapsed_ms(&self, earlier: i64) -> i64 {
        self.now_ms().saturating_sub(earlier).max(0)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ms: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(start_ms: i64) -> Self {
        Self {
            now_ms: Arc::new(AtomicI64::new(start_ms)),
        }
    }

    pub fn advance(&self, ms: i64) {
        self.now_ms.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn set(&self, ms: i64) {
        self.now_ms.store(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new(1_000);
        let view = clock.clone();
        clock.advance(250);
        assert_eq!(view.now_ms(), 1_250);
        assert_eq!(view.elapsed_ms(1_000), 250);
        assert_eq!(view.elapsed_ms(5_000), 0);
    }

    #[test]
    fn manual_clock_converts_to_utc() {
        let clock = ManualClock::new(0);
        clock.set(86_400_000);
        assert_eq!(clock.now().to_rfc3339(), "1970-01-02T00:00:00+00:00");
        clock.advance(125);
        assert_eq!(clock.iso_timestamp(), "1970-01-02T00:00:00.125Z");
        assert_eq!(clock.date_stamp(), "1970-01-02");
    }

    #[test]
    fn system_clock_is_after_2020() {
        assert!(SystemClock.now_ms() > 1_577_836_800_000);
    }
}
