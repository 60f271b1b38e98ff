use super::costing::Costing;
use super::raw;
use crate::money::{Money, lenient_decimal};
use crate::settings::{ExpenseSnapshot, Settings};
use anyhow::{Context, Error, Result};
use chrono::NaiveDate;
use num_traits::{One, Zero};
use rust_decimal::Decimal;
use std::convert::TryFrom;

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y", "%Y/%m/%d"];

/// Calendar date parsing for records. A date that fits none of the known
/// formats yields `None`; such trips stay out of windowed views but still
/// count in all-time figures.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

/// A recorded trip: the facts the driver entered plus the expense
/// configuration snapshotted when the trip was recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    id: String,
    pub date_text: String,
    pub date: Option<NaiveDate>,
    pub days_in_trip: Decimal,
    pub from_location: String,
    pub to_location: String,
    pub gross: Money,
    pub miles: Decimal,
    pub notes: Option<String>,
    pub expenses: Option<ExpenseSnapshot>,
}

impl Trip {
    pub fn id(&self) -> String {
        self.id.clone()
    }

    pub fn route(&self) -> String {
        format!("{} to {}", self.from_location, self.to_location)
    }

    /// Derived cost breakdown. The trip's own snapshot takes precedence;
    /// live settings only fill in for trips recorded without one.
    pub fn costing(&self, settings: &Settings) -> Costing {
        match &self.expenses {
            Some(snapshot) => Costing::compute(self, settings, snapshot),
            None => Costing::compute(self, settings, &settings.snapshot()),
        }
    }
}

impl TryFrom<raw::Entry> for Trip {
    type Error = Error;

    fn try_from(raw_entry: raw::Entry) -> Result<Self> {
        let date_text = raw_entry.date.unwrap_or_default();
        let date = parse_date(&date_text);
        let mut days_in_trip = lenient_decimal(raw_entry.days_in_trip.as_ref());
        // zero or missing days count as one, so weekly rent never collapses
        if days_in_trip <= Decimal::zero() {
            days_in_trip = Decimal::one();
        }
        let miles = lenient_decimal(raw_entry.miles.as_ref()).max(Decimal::zero());
        Ok(Trip {
            id: raw_entry.id.context("Id missing!")?,
            date_text,
            date,
            days_in_trip,
            from_location: raw_entry.from_location.unwrap_or_default(),
            to_location: raw_entry.to_location.unwrap_or_default(),
            gross: Money::lenient(raw_entry.gross.as_ref()),
            miles,
            notes: raw_entry.notes,
            expenses: raw_entry.expenses.map(Into::into),
        })
    }
}

#[cfg(test)]
mod trip_tests {
    use super::*;
    use crate::money::Figure;
    use std::convert::TryInto;

    fn raw_trip() -> raw::Entry {
        raw::Entry {
            id: Some("t1".into()),
            r#type: "Trip".into(),
            date: Some("3000-01-05".into()),
            days_in_trip: Some(Figure::Number(2.0)),
            from_location: Some("Chicago".into()),
            to_location: Some("Dallas".into()),
            gross: Some(Figure::Text("1000".into())),
            miles: Some(Figure::Number(500.0)),
            ..Default::default()
        }
    }

    #[test]
    fn parses_known_date_formats() {
        assert!(parse_date("3000-01-05").is_some());
        assert!(parse_date("01/05/3000").is_some());
        assert!(parse_date("05.01.3000").is_some());
        assert!(parse_date("next tuesday").is_none());
        assert!(parse_date("").is_none());
    }

    #[test]
    fn trip_from_raw() -> Result<()> {
        let trip: Trip = raw_trip().try_into()?;
        assert_eq!(trip.id(), "t1");
        assert_eq!(trip.route(), "Chicago to Dallas");
        assert_eq!(trip.gross.to_string(), "$1000.00");
        assert_eq!(trip.days_in_trip, Decimal::from(2));
        assert!(trip.expenses.is_none());
        Ok(())
    }

    #[test]
    fn missing_days_count_as_one() -> Result<()> {
        let trip: Trip = raw::Entry {
            days_in_trip: None,
            ..raw_trip()
        }
        .try_into()?;
        assert_eq!(trip.days_in_trip, Decimal::one());

        let trip: Trip = raw::Entry {
            days_in_trip: Some(Figure::Number(0.0)),
            ..raw_trip()
        }
        .try_into()?;
        assert_eq!(trip.days_in_trip, Decimal::one());
        Ok(())
    }

    #[test]
    fn unparseable_date_is_kept_as_text() -> Result<()> {
        let trip: Trip = raw::Entry {
            date: Some("sometime in spring".into()),
            ..raw_trip()
        }
        .try_into()?;
        assert!(trip.date.is_none());
        assert_eq!(trip.date_text, "sometime in spring");
        Ok(())
    }
}
