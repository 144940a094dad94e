//! Calendar month used to scope expense views and rollovers.

use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PeriodError {
    #[error("Month must be between 1 and 12, got {0}")]
    InvalidMonth(u32),
    #[error("Year {0} is out of range")]
    InvalidYear(i32),
    #[error("Invalid month format '{0}', expected YYYY-MM or YYYY-MM-DD")]
    InvalidFormat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodError::InvalidMonth(month));
        }
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() || !(1..=9999).contains(&year) {
            return Err(PeriodError::InvalidYear(year));
        }
        Ok(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The following month, wrapping December into January of the next year.
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, self.days_in_month()).unwrap_or(NaiveDate::MAX)
    }

    pub fn days_in_month(&self) -> u32 {
        match self.month {
            2 => {
                if is_leap_year(self.year) {
                    29
                } else {
                    28
                }
            }
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// "YYYY-MM"
    pub fn month_year(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = PeriodError;

    /// Accepts "YYYY-MM" and "YYYY-MM-DD" (the day is ignored beyond validation).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Ok(Self::from_date(date));
        }

        let invalid = || PeriodError::InvalidFormat(trimmed.to_string());
        let (year, month) = trimmed.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.is_empty() || month.len() > 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_wraps_december() {
        let december = Period::new(2025, 12).unwrap();
        assert_eq!(december.next(), Period::new(2026, 1).unwrap());

        let june = Period::new(2025, 6).unwrap();
        assert_eq!(june.next(), Period::new(2025, 7).unwrap());
    }

    #[test]
    fn test_rejects_invalid_month() {
        assert_eq!(Period::new(2025, 0), Err(PeriodError::InvalidMonth(0)));
        assert_eq!(Period::new(2025, 13), Err(PeriodError::InvalidMonth(13)));
    }

    #[test]
    fn test_month_bounds() {
        let feb_leap = Period::new(2024, 2).unwrap();
        assert_eq!(feb_leap.last_day(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let feb = Period::new(2025, 2).unwrap();
        assert_eq!(feb.first_day(), NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
        assert_eq!(feb.last_day(), NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());

        assert!(feb.contains(NaiveDate::from_ymd_opt(2025, 2, 14).unwrap()));
        assert!(!feb.contains(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()));
    }

    #[test]
    fn test_parse_and_format() {
        let period: Period = "2026-01".parse().unwrap();
        assert_eq!(period.month_year(), "2026-01");
        assert_eq!(period.to_string(), "2026-01");

        let from_date: Period = "2025-03-01".parse().unwrap();
        assert_eq!(from_date, Period::new(2025, 3).unwrap());

        assert!("2025".parse::<Period>().is_err());
        assert!("2025-13".parse::<Period>().is_err());
        assert!("march".parse::<Period>().is_err());
    }
}
