//! Report template rendering.

use chrono::{DateTime, Utc};

/// Timestamp layout used in report headers.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Source of the current UTC instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Render a report for `filename` at `time`.
///
/// File size is shown in kilobytes (1024 bytes) with no decimal places.
pub fn render(filename: &str, filesize_bytes: u64, time: DateTime<Utc>, message: &str) -> String {
    let filesize_kb = filesize_bytes as f64 / 1024.0;
    format!(
        "File Name: \t {filename}\nFile Size: \t {filesize_kb:.0} kB\nTime (UTC): \t {time}\n\n{message}",
        time = time.format(TIME_FORMAT),
    )
}

/// Renders reports stamped by a [`Clock`].
pub struct ReportFormatter<C: Clock = SystemClock> {
    clock: C,
}

impl ReportFormatter<SystemClock> {
    pub fn system() -> Self {
        Self { clock: SystemClock }
    }
}

impl Default for ReportFormatter<SystemClock> {
    fn default() -> Self {
        Self::system()
    }
}

impl<C: Clock> ReportFormatter<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    /// Render a report stamped with the clock's current instant.
    pub fn format(&self, filename: &str, filesize_bytes: u64, message: &str) -> String {
        render(filename, filesize_bytes, self.clock.now(), message)
    }
}
