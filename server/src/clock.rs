use chrono::{Local, NaiveDate};

/// `YYYY-MM-DD`, zero padded.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Source of "today" for the temperature write guard.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Server local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock pinned to one day, for tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses a strict, zero-padded `YYYY-MM-DD` date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    if raw.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_date_pads_month_and_day() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(format_date(date), "2024-03-07");
    }

    #[test]
    fn fixed_clock_returns_its_day() {
        let date = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        assert_eq!(FixedClock(date).today(), date);
    }

    #[test]
    fn parse_date_requires_padding() {
        assert_eq!(
            parse_date("2024-01-05"),
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
        assert!(parse_date("2024-1-5").is_none());
        assert!(parse_date("2024-02-30").is_none());
        assert!(parse_date("yesterday!").is_none());
    }
}
