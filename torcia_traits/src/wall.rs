use chrono::{DateTime, Utc};

/// Source of calendar time for log entries and exported reports.
pub trait WallClock {
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Wall clock backed by the system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemWallClock;

impl WallClock for SystemWallClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Wall clock frozen at a fixed instant; keeps report output reproducible.
#[derive(Debug, Clone, Copy)]
pub struct FixedWallClock(pub DateTime<Utc>);

impl WallClock for FixedWallClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.0
    }
}
