use super::trip::Trip;
use crate::money::Money;
use crate::settings::{ExpenseSnapshot, Settings};
use num_traits::Zero;
use rust_decimal::Decimal;

/// Derived cost breakdown for one trip, in cents.
///
/// Two identities hold exactly:
/// `total_expenses == company_deductions + additional_expenses` and
/// `net_profit == gross - total_expenses`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Costing {
    pub rent_charge: Money,
    pub percentage_charge: Money,
    pub mile_charge: Money,
    pub company_deductions: Money,
    pub additional_expenses: Money,
    pub total_expenses: Money,
    pub net_profit: Money,
    pub rate_per_mile: Money,
}

impl Costing {
    /// Pure function of the trip facts and the expense configuration.
    /// Recomputing after any upstream change is always safe; nothing is
    /// cached or mutated. A negative net profit is a valid result, it marks
    /// an unprofitable trip.
    pub fn compute(trip: &Trip, settings: &Settings, lines: &ExpenseSnapshot) -> Self {
        let rent_charge =
            (settings.rent_per_week / Decimal::from(7) * trip.days_in_trip).to_cents();
        let percentage_charge =
            (trip.gross * (settings.percentage_from_gross / Decimal::from(100))).to_cents();
        let mile_charge = (settings.rate_per_mile * trip.miles).to_cents();
        let company_deductions = rent_charge + percentage_charge + mile_charge;
        let additional_expenses = lines.enabled_total();
        let total_expenses = company_deductions + additional_expenses;
        let net_profit = trip.gross - total_expenses;
        let rate_per_mile = if trip.miles > Decimal::zero() {
            (trip.gross / trip.miles).to_cents()
        } else {
            Money::zero()
        };
        Costing {
            rent_charge,
            percentage_charge,
            mile_charge,
            company_deductions,
            additional_expenses,
            total_expenses,
            net_profit,
            rate_per_mile,
        }
    }
}
