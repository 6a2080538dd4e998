use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Local;

use crate::database::models::Srno;

/// Server-generated values stamped onto every new scheme.
pub trait StampSource: Send + Sync {
    fn current_time(&self) -> String;
    fn current_date(&self) -> String;
    fn next_srno(&self) -> Srno;
}

/// Wall-clock stamps and a process-wide increasing serial number.
pub struct SystemStamps {
    counter: AtomicU64,
}

impl SystemStamps {
    pub const TIME_FORMAT: &'static str = "%H:%M:%S";
    pub const DATE_FORMAT: &'static str = "%d-%m-%Y";

    /// Serial numbers start at the current Unix time in milliseconds so they
    /// keep increasing across restarts.
    pub fn new() -> Self {
        let seed = chrono::Utc::now().timestamp_millis().max(0) as u64;
        Self::starting_at(seed)
    }

    pub fn starting_at(first: u64) -> Self {
        Self { counter: AtomicU64::new(first) }
    }
}

impl Default for SystemStamps {
    fn default() -> Self {
        Self::new()
    }
}

impl StampSource for SystemStamps {
    fn current_time(&self) -> String {
        Local::now().format(Self::TIME_FORMAT).to_string()
    }

    fn current_date(&self) -> String {
        Local::now().format(Self::DATE_FORMAT).to_string()
    }

    fn next_srno(&self) -> Srno {
        Srno::Number(self.counter.fetch_add(1, Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serial_numbers_increase() {
        let stamps = SystemStamps::starting_at(100);
        assert_eq!(stamps.next_srno(), Srno::Number(100));
        assert_eq!(stamps.next_srno(), Srno::Number(101));
    }

    #[test]
    fn time_and_date_use_fixed_formats() {
        let stamps = SystemStamps::new();
        let time = stamps.current_time();
        let date = stamps.current_date();
        assert!(chrono::NaiveTime::parse_from_str(&time, SystemStamps::TIME_FORMAT).is_ok(), "{}", time);
        assert!(chrono::NaiveDate::parse_from_str(&date, SystemStamps::DATE_FORMAT).is_ok(), "{}", date);
    }
}
