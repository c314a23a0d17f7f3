//! Partial-precision `date` and `dateTime` values

use crate::error::Error;
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc};
use std::fmt;
use std::str::FromStr;

/// A FHIR `date`: a year, a year and month, or a full calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FhirDate {
    Year(i32),
    YearMonth(i32, u32),
    Date(NaiveDate),
}

impl FhirDate {
    pub fn year(&self) -> i32 {
        match self {
            FhirDate::Year(year) | FhirDate::YearMonth(year, _) => *year,
            FhirDate::Date(date) => date.year(),
        }
    }
}

impl FromStr for FhirDate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid =
            || Error::invalid_value("date", format!("'{}' is not YYYY, YYYY-MM or YYYY-MM-DD", s));
        let parts: Vec<&str> = s.split('-').collect();
        let (year, rest) = parts.split_first().ok_or_else(invalid)?;
        let year = digits(year, 4).ok_or_else(invalid)? as i32;
        match rest {
            [] => Ok(FhirDate::Year(year)),
            [month] => match digits(month, 2) {
                Some(month @ 1..=12) => Ok(FhirDate::YearMonth(year, month)),
                _ => Err(invalid()),
            },
            [month, day] => {
                let month = digits(month, 2).ok_or_else(invalid)?;
                let day = digits(day, 2).ok_or_else(invalid)?;
                NaiveDate::from_ymd_opt(year, month, day)
                    .map(FhirDate::Date)
                    .ok_or_else(invalid)
            }
            _ => Err(invalid()),
        }
    }
}

/// A number written with exactly `width` ASCII digits.
fn digits(part: &str, width: usize) -> Option<u32> {
    if part.len() != width || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

impl fmt::Display for FhirDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FhirDate::Year(year) => write!(f, "{:04}", year),
            FhirDate::YearMonth(year, month) => write!(f, "{:04}-{:02}", year, month),
            FhirDate::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

impl From<NaiveDate> for FhirDate {
    fn from(value: NaiveDate) -> Self {
        FhirDate::Date(value)
    }
}

/// A FHIR `dateTime`: a partial date, or a timestamp with a UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FhirDateTime {
    Partial(FhirDate),
    DateTime(DateTime<FixedOffset>),
}

impl FromStr for FhirDateTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains('T') {
            DateTime::parse_from_rfc3339(s)
                .map(FhirDateTime::DateTime)
                .map_err(|e| Error::invalid_value("dateTime", format!("'{}': {}", s, e)))
        } else {
            s.parse::<FhirDate>()
                .map(FhirDateTime::Partial)
                .map_err(|_| {
                    Error::invalid_value("dateTime", format!("'{}' is not a valid dateTime", s))
                })
        }
    }
}

impl fmt::Display for FhirDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FhirDateTime::Partial(date) => write!(f, "{}", date),
            FhirDateTime::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
        }
    }
}

impl From<FhirDate> for FhirDateTime {
    fn from(value: FhirDate) -> Self {
        FhirDateTime::Partial(value)
    }
}

impl From<NaiveDate> for FhirDateTime {
    fn from(value: NaiveDate) -> Self {
        FhirDateTime::Partial(FhirDate::Date(value))
    }
}

impl From<DateTime<FixedOffset>> for FhirDateTime {
    fn from(value: DateTime<FixedOffset>) -> Self {
        FhirDateTime::DateTime(value)
    }
}

impl From<DateTime<Utc>> for FhirDateTime {
    fn from(value: DateTime<Utc>) -> Self {
        FhirDateTime::DateTime(value.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_dates() {
        assert_eq!("2024".parse::<FhirDate>().unwrap(), FhirDate::Year(2024));
        assert_eq!("2024-03".parse::<FhirDate>().unwrap(), FhirDate::YearMonth(2024, 3));
        assert_eq!(
            "2024-03-15".parse::<FhirDate>().unwrap(),
            FhirDate::Date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
        );
        assert!("2024-13".parse::<FhirDate>().is_err());
        assert!("2024-02-30".parse::<FhirDate>().is_err());
        assert!("24".parse::<FhirDate>().is_err());
    }

    #[test]
    fn date_parts_have_fixed_width() {
        let malformed = [
            "+024",
            "-2024",
            "2024-3",
            "2024-3-15",
            "2024-03-5",
            "２０２４",
            "2024-03-15-01",
        ];
        for text in malformed {
            assert!(text.parse::<FhirDate>().is_err(), "{text}");
        }
    }

    #[test]
    fn date_display_round_trips() {
        for text in ["2024", "2024-03", "2024-03-15"] {
            assert_eq!(text.parse::<FhirDate>().unwrap().to_string(), text);
        }
    }

    #[test]
    fn parses_date_times() {
        let value: FhirDateTime = "2024-03-15T10:30:00+02:00".parse().unwrap();
        assert!(matches!(value, FhirDateTime::DateTime(_)));
        let partial: FhirDateTime = "2024-03".parse().unwrap();
        assert_eq!(partial, FhirDateTime::Partial(FhirDate::YearMonth(2024, 3)));
        assert!("2024-03-15T10:30:00".parse::<FhirDateTime>().is_err());
    }
}
