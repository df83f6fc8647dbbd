//! Wall clock and Portuguese date phrasing

use chrono::{DateTime, Datelike, Local};

const MONTHS: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

/// Source of the current local time
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

/// The system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock stuck at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

/// "14:05"
#[must_use]
pub fn spoken_time(now: DateTime<Local>) -> String {
    now.format("%H:%M").to_string()
}

/// "18 de outubro de 2026"
#[must_use]
pub fn spoken_date(now: DateTime<Local>) -> String {
    let month = MONTHS[now.month0() as usize];
    format!("{:02} de {month} de {}", now.day(), now.year())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_spoken_time_and_date() {
        let clock = FixedClock(Local.with_ymd_and_hms(2026, 3, 7, 14, 5, 0).unwrap());
        assert_eq!(spoken_time(clock.now()), "14:05");
        assert_eq!(spoken_date(clock.now()), "07 de março de 2026");
    }
}
