use crate::entry::costing::Costing;
use crate::entry::trip::Trip;
use crate::money::Money;
use crate::settings::Settings;
use chrono::{Datelike, Duration, NaiveDate};
use num_traits::Zero;
use rust_decimal::Decimal;
use std::fmt;

/// Inclusive whole-day date window. No bounds means all-time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Window {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl Window {
    pub fn all_time() -> Self {
        Window::default()
    }

    pub fn between(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Window { from, to }
    }

    pub fn is_all_time(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// A trip whose date never parsed matches no window filter, but still
    /// counts in all-time views.
    pub fn contains(&self, date: Option<NaiveDate>) -> bool {
        if self.is_all_time() {
            return true;
        }
        match date {
            None => false,
            Some(d) => {
                self.from.map_or(true, |from| d >= from) && self.to.map_or(true, |to| d <= to)
            }
        }
    }
}

/// Monday-start ISO week around a pivot date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Week {
    start: NaiveDate,
}

impl Week {
    pub fn containing(pivot: NaiveDate) -> Self {
        let days_from_monday = pivot.weekday().num_days_from_monday() as i64;
        Week {
            start: pivot - Duration::days(days_from_monday),
        }
    }

    /// Steps whole weeks back or forward.
    pub fn offset(self, weeks: i64) -> Self {
        Week {
            start: self.start + Duration::days(7 * weeks),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.start + Duration::days(6)
    }

    pub fn window(&self) -> Window {
        Window::between(Some(self.start()), Some(self.end()))
    }

    pub fn label(&self) -> String {
        format!(
            "Week {} ({} to {})",
            self.start.iso_week().week(),
            self.start(),
            self.end()
        )
    }
}

/// A trip together with its derived cost breakdown.
#[derive(Debug, Clone)]
pub struct TripReport {
    pub trip: Trip,
    pub costing: Costing,
}

impl TripReport {
    pub fn new(trip: Trip, settings: &Settings) -> Self {
        let costing = trip.costing(settings);
        TripReport { trip, costing }
    }
}

impl fmt::Display for TripReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let date = if self.trip.date_text.is_empty() {
            "(no date)"
        } else {
            self.trip.date_text.as_str()
        };
        write!(
            f,
            "{:<10} | {:<28} | {:>10} | {:>10} | {:>10} | {:>7}",
            date,
            self.trip.route(),
            self.trip.gross.to_string(),
            self.costing.total_expenses.to_string(),
            self.costing.net_profit.to_string(),
            self.costing.rate_per_mile.to_string(),
        )
    }
}

/// Aggregate statistics over a collection of trips.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Summary {
    pub total_trips: u32,
    pub total_gross: Money,
    pub total_miles: Decimal,
    pub total_profit: Money,
    pub avg_rpm: Money,
    pub avg_profit_per_trip: Money,
}

impl Summary {
    /// Folds the reports that fall inside the window. An empty selection is
    /// an all-zero summary, never an error.
    pub fn of<'a, I>(reports: I, window: &Window) -> Summary
    where
        I: IntoIterator<Item = &'a TripReport>,
    {
        let mut summary = reports
            .into_iter()
            .filter(|report| window.contains(report.trip.date))
            .fold(Summary::default(), |mut acc, report| {
                acc.total_trips += 1;
                acc.total_gross += report.trip.gross;
                acc.total_miles += report.trip.miles;
                acc.total_profit += report.costing.net_profit;
                acc
            });
        if summary.total_miles > Decimal::zero() {
            summary.avg_rpm = (summary.total_gross / summary.total_miles).to_cents();
        }
        if summary.total_trips > 0 {
            summary.avg_profit_per_trip =
                (summary.total_profit / Decimal::from(summary.total_trips)).to_cents();
        }
        summary
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pad = 12;
        writeln!(f, "{:<14} {:>pad$}", "Trips", self.total_trips)?;
        writeln!(f, "{:<14} {:>pad$}", "Gross", self.total_gross.to_string())?;
        writeln!(f, "{:<14} {:>pad$}", "Miles", self.total_miles.to_string())?;
        writeln!(f, "{:<14} {:>pad$}", "Profit", self.total_profit.to_string())?;
        writeln!(f, "{:<14} {:>pad$}", "Avg RPM", self.avg_rpm.to_string())?;
        write!(
            f,
            "{:<14} {:>pad$}",
            "Avg per trip",
            self.avg_profit_per_trip.to_string()
        )
    }
}

#[cfg(test)]
mod summary_tests {
    use super::*;
    use crate::entry::raw;
    use crate::money::Figure;
    use anyhow::Result;
    use std::convert::TryInto;

    fn report(date: &str, gross: f64, miles: f64) -> TripReport {
        let trip: Trip = raw::Entry {
            id: Some(format!("{}-{}", date, gross)),
            r#type: "Trip".into(),
            date: Some(date.into()),
            gross: Some(Figure::Number(gross)),
            miles: Some(Figure::Number(miles)),
            ..Default::default()
        }
        .try_into()
        .unwrap();
        TripReport::new(trip, &Settings::default())
    }

    #[test]
    fn empty_selection_is_all_zeros() {
        let summary = Summary::of(&Vec::new(), &Window::all_time());
        assert_eq!(summary, Summary::default());
        assert!(summary.avg_rpm.is_zero());
        assert!(summary.avg_profit_per_trip.is_zero());
    }

    #[test]
    fn all_time_includes_unparseable_dates() {
        let reports = vec![
            report("3000-01-05", 1000.0, 500.0),
            report("whenever", 500.0, 250.0),
        ];
        let summary = Summary::of(&reports, &Window::all_time());
        assert_eq!(summary.total_trips, 2);
        assert_eq!(summary.total_gross.to_string(), "$1500.00");
    }

    #[test]
    fn windowed_view_drops_unparseable_dates() -> Result<()> {
        let reports = vec![
            report("3000-01-05", 1000.0, 500.0),
            report("3000-02-01", 800.0, 400.0),
            report("whenever", 500.0, 250.0),
        ];
        let window = Window::between(
            Some("3000-01-01".parse()?),
            Some("3000-01-31".parse()?),
        );
        let summary = Summary::of(&reports, &window);
        assert_eq!(summary.total_trips, 1);
        assert_eq!(summary.total_gross.to_string(), "$1000.00");
        Ok(())
    }

    #[test]
    fn averages() {
        let reports = vec![
            report("3000-01-05", 1000.0, 500.0),
            report("3000-01-06", 500.0, 250.0),
        ];
        let summary = Summary::of(&reports, &Window::all_time());
        assert_eq!(summary.avg_rpm.to_string(), "$2.00");
        // no charges configured, so profit equals gross
        assert_eq!(summary.avg_profit_per_trip.to_string(), "$750.00");
        assert_eq!(summary.total_miles, Decimal::from(750));
    }

    #[test]
    fn week_starts_monday_and_ends_sunday() -> Result<()> {
        // a Thursday
        let week = Week::containing("2026-08-06".parse()?);
        assert_eq!(week.start(), "2026-08-03".parse()?);
        assert_eq!(week.end(), "2026-08-09".parse()?);
        assert_eq!(week.label(), "Week 32 (2026-08-03 to 2026-08-09)");

        // pivot on the boundaries maps to the same week
        assert_eq!(Week::containing(week.start()), week);
        assert_eq!(Week::containing(week.end()), week);
        Ok(())
    }

    #[test]
    fn week_window_membership() -> Result<()> {
        let window = Week::containing("2026-08-06".parse()?).window();
        assert!(window.contains(Some("2026-08-03".parse()?)), "Monday in");
        assert!(window.contains(Some("2026-08-09".parse()?)), "Sunday in");
        assert!(!window.contains(Some("2026-08-10".parse()?)), "next Monday out");
        assert!(!window.contains(None), "undated trips match no window");
        Ok(())
    }

    #[test]
    fn week_navigation_steps_whole_weeks() -> Result<()> {
        let week = Week::containing("2026-08-06".parse()?);
        assert_eq!(week.offset(-1).start(), "2026-07-27".parse()?);
        assert_eq!(week.offset(1).start(), "2026-08-10".parse()?);
        assert_eq!(week.offset(1).offset(-1), week);
        Ok(())
    }
}
