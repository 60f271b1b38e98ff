use anyhow::{Context, Error, Result};
use num_traits::Zero;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};
use std::str::FromStr;

/// Monetary amount backed by a `Decimal`.
/// Displayed to at least 2 dp, negatives in accounting parentheses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(pub Decimal);

/// A numeric field as it arrives in records: a plain number, or free text
/// that may use a comma decimal separator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Figure {
    Number(f64),
    Text(String),
}

/// Tolerant numeric field parsing: a missing or unreadable figure is 0,
/// comma decimal separators are normalized to dots.
pub fn lenient_decimal(figure: Option<&Figure>) -> Decimal {
    match figure {
        None => Decimal::zero(),
        Some(Figure::Number(f)) => Decimal::from_f64(*f).unwrap_or_default(),
        Some(Figure::Text(s)) => {
            let normalized = s.trim().replace(',', ".");
            Decimal::from_str(&normalized).unwrap_or_default()
        }
    }
}

impl Money {
    pub fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Tolerant constructor applied to every monetary record field.
    pub fn lenient(figure: Option<&Figure>) -> Self {
        Money(lenient_decimal(figure))
    }

    /// Rounded to cents.
    pub fn to_cents(self) -> Self {
        Money(self.0.round_dp(2))
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }
}

impl TryFrom<f64> for Money {
    type Error = Error;

    fn try_from(f: f64) -> Result<Self> {
        let mut d = Decimal::from_f64(f).context(format!("Failed to convert {} to Money", f))?;
        if d.scale() < 2 {
            d.rescale(2);
        }
        Ok(Self(d))
    }
}

impl FromStr for Money {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut d: Decimal = s
            .trim()
            .trim_start_matches('$')
            .parse()
            .context(format!("Failed to parse '{}' as Money", s))?;
        if d.scale() < 2 {
            d.rescale(2);
        }
        Ok(Self(d))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = self.0;
        if d.scale() < 2 {
            d.rescale(2);
        }
        if d.is_sign_negative() {
            write!(f, "(${})", -d)
        } else {
            write!(f, "${}", d)
        }
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money(self.0 - other.0)
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl Mul<Decimal> for Money {
    type Output = Money;

    fn mul(self, factor: Decimal) -> Money {
        Money(self.0 * factor)
    }
}

/// Callers must guard the divisor; dividing money by zero is a logic error.
impl Div<Decimal> for Money {
    type Output = Money;

    fn div(self, divisor: Decimal) -> Money {
        Money(self.0 / divisor)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), Add::add)
    }
}

impl Zero for Money {
    fn zero() -> Self {
        Money(Decimal::zero())
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}
