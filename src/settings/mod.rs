pub mod raw;

use crate::money::{Figure, Money, lenient_decimal};
use anyhow::{Error, Result};
use async_std::fs;
use num_traits::Zero;
use rust_decimal::Decimal;
use std::convert::{TryFrom, TryInto};
use std::io::ErrorKind;
use std::str::FromStr;

/// Fixed deductible cost categories every driver starts with.
pub const STANDARD_EXPENSES: [&str; 6] = [
    "Fuel",
    "Tolls",
    "Insurance",
    "Maintenance",
    "Parking",
    "Food",
];

/// One deductible cost category. Custom lines carry an id, standard lines
/// are addressed by name.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseLine {
    pub id: Option<String>,
    pub name: String,
    pub enabled: bool,
    pub amount: Money,
}

/// Per-driver configuration: company charge rates plus the deductible
/// expense lines applied to each trip.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub nickname: String,
    pub rent_per_week: Money,
    /// Company cut of gross, 0 to 100.
    pub percentage_from_gross: Decimal,
    pub rate_per_mile: Money,
    pub expenses: Vec<ExpenseLine>,
    pub custom_expenses: Vec<ExpenseLine>,
}

/// Expense configuration captured at trip-record time so later settings
/// edits never shift historical profit figures.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExpenseSnapshot {
    pub standard: Vec<ExpenseLine>,
    pub custom: Vec<ExpenseLine>,
}

/// One settings mutation. Applied through [`Settings::apply`], which returns
/// the updated value and leaves the original untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsAction {
    SetNickname(String),
    SetRentPerWeek(Money),
    SetPercentageFromGross(Decimal),
    SetRatePerMile(Money),
    /// Standard line name or custom line id.
    ToggleExpense(String),
    SetExpenseAmount(String, Money),
    AddCustomExpense { name: String, amount: Money },
    RemoveCustomExpense(String),
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            nickname: String::new(),
            rent_per_week: Money::zero(),
            percentage_from_gross: Decimal::zero(),
            rate_per_mile: Money::zero(),
            expenses: STANDARD_EXPENSES
                .iter()
                .map(|name| ExpenseLine {
                    id: None,
                    name: (*name).to_owned(),
                    enabled: false,
                    amount: Money::zero(),
                })
                .collect(),
            custom_expenses: Vec::new(),
        }
    }
}

impl Settings {
    /// Reads the settings doc, or starts from defaults if none exists yet.
    pub async fn load_or_default(path: &str) -> Result<Self> {
        match fs::read_to_string(path).await {
            Ok(doc) => doc.parse(),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Settings::default()),
            Err(err) => Err(Error::new(err)),
        }
    }

    pub fn to_doc(&self) -> Result<String> {
        let raw: raw::Settings = self.into();
        Ok(serde_yaml::to_string(&raw)?)
    }

    /// Copy of the current expense configuration, taken when a trip is
    /// recorded or edited.
    pub fn snapshot(&self) -> ExpenseSnapshot {
        ExpenseSnapshot {
            standard: self.expenses.clone(),
            custom: self.custom_expenses.clone(),
        }
    }

    /// Reducer: applies one action and returns the new settings value.
    /// An action addressing a line that doesn't exist changes nothing.
    pub fn apply(&self, action: SettingsAction) -> Settings {
        use SettingsAction::*;
        let mut next = self.clone();
        match action {
            SetNickname(nickname) => next.nickname = nickname,
            SetRentPerWeek(amount) => next.rent_per_week = amount,
            SetPercentageFromGross(pct) => {
                next.percentage_from_gross = clamp_percentage(pct);
            }
            SetRatePerMile(rate) => next.rate_per_mile = rate,
            ToggleExpense(key) => {
                if let Some(line) = next.line_mut(&key) {
                    line.enabled = !line.enabled;
                }
            }
            SetExpenseAmount(key, amount) => {
                if let Some(line) = next.line_mut(&key) {
                    line.amount = amount;
                }
            }
            AddCustomExpense { name, amount } => {
                let id = next.next_custom_id();
                next.custom_expenses.push(ExpenseLine {
                    id: Some(id),
                    name,
                    enabled: true,
                    amount,
                });
            }
            RemoveCustomExpense(id) => {
                next.custom_expenses
                    .retain(|line| line.id.as_deref() != Some(id.as_str()));
            }
        }
        next
    }

    /// Looks up a standard line by name, then a custom line by id.
    pub fn line_mut(&mut self, key: &str) -> Option<&mut ExpenseLine> {
        if let Some(pos) = self.expenses.iter().position(|line| line.name == key) {
            return self.expenses.get_mut(pos);
        }
        self.custom_expenses
            .iter_mut()
            .find(|line| line.id.as_deref() == Some(key))
    }

    pub fn has_line(&self, key: &str) -> bool {
        self.expenses.iter().any(|line| line.name == key)
            || self
                .custom_expenses
                .iter()
                .any(|line| line.id.as_deref() == Some(key))
    }

    fn next_custom_id(&self) -> String {
        let mut n = self.custom_expenses.len() + 1;
        loop {
            let id = format!("custom-{}", n);
            if !self
                .custom_expenses
                .iter()
                .any(|line| line.id.as_deref() == Some(id.as_str()))
            {
                return id;
            }
            n += 1;
        }
    }
}

impl ExpenseSnapshot {
    /// Sum of enabled line amounts; disabled lines contribute nothing.
    pub fn enabled_total(&self) -> Money {
        self.standard
            .iter()
            .chain(self.custom.iter())
            .filter(|line| line.enabled)
            .map(|line| line.amount)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.standard.is_empty() && self.custom.is_empty()
    }
}

fn clamp_percentage(pct: Decimal) -> Decimal {
    pct.clamp(Decimal::zero(), Decimal::from(100))
}

fn line_from_raw(raw_line: raw::Line) -> ExpenseLine {
    ExpenseLine {
        id: raw_line.id,
        name: raw_line.name,
        enabled: raw_line.enabled.unwrap_or(true),
        amount: Money::lenient(raw_line.amount.as_ref()).to_cents(),
    }
}

fn line_to_raw(line: &ExpenseLine) -> raw::Line {
    raw::Line {
        id: line.id.clone(),
        name: line.name.clone(),
        enabled: Some(line.enabled),
        amount: Some(Figure::Text(line.amount.0.to_string())),
    }
}

impl TryFrom<raw::Settings> for Settings {
    type Error = Error;

    fn try_from(raw_settings: raw::Settings) -> Result<Self> {
        let defaults = Settings::default();
        let expenses = raw_settings
            .expenses
            .map_or(defaults.expenses, |lines| {
                lines.into_iter().map(line_from_raw).collect()
            });
        let custom_expenses = raw_settings
            .custom_expenses
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(i, raw_line)| {
                let mut line = line_from_raw(raw_line);
                line.id.get_or_insert(format!("custom-{}", i + 1));
                line
            })
            .collect();
        Ok(Settings {
            nickname: raw_settings.nickname.unwrap_or_default(),
            rent_per_week: Money::lenient(raw_settings.rent_per_week.as_ref()),
            percentage_from_gross: clamp_percentage(lenient_decimal(
                raw_settings.percentage_from_gross.as_ref(),
            )),
            rate_per_mile: Money::lenient(raw_settings.rate_per_mile.as_ref()),
            expenses,
            custom_expenses,
        })
    }
}

impl From<&Settings> for raw::Settings {
    fn from(settings: &Settings) -> Self {
        raw::Settings {
            nickname: Some(settings.nickname.clone()),
            rent_per_week: Some(Figure::Text(settings.rent_per_week.0.to_string())),
            percentage_from_gross: Some(Figure::Text(settings.percentage_from_gross.to_string())),
            rate_per_mile: Some(Figure::Text(settings.rate_per_mile.0.to_string())),
            expenses: Some(settings.expenses.iter().map(line_to_raw).collect()),
            custom_expenses: Some(settings.custom_expenses.iter().map(line_to_raw).collect()),
        }
    }
}

impl From<raw::Snapshot> for ExpenseSnapshot {
    fn from(raw_snapshot: raw::Snapshot) -> Self {
        ExpenseSnapshot {
            standard: raw_snapshot
                .standard
                .unwrap_or_default()
                .into_iter()
                .map(line_from_raw)
                .collect(),
            custom: raw_snapshot
                .custom
                .unwrap_or_default()
                .into_iter()
                .map(line_from_raw)
                .collect(),
        }
    }
}

impl From<&ExpenseSnapshot> for raw::Snapshot {
    fn from(snapshot: &ExpenseSnapshot) -> Self {
        raw::Snapshot {
            standard: Some(snapshot.standard.iter().map(line_to_raw).collect()),
            custom: Some(snapshot.custom.iter().map(line_to_raw).collect()),
        }
    }
}

impl FromStr for Settings {
    type Err = Error;

    fn from_str(doc: &str) -> Result<Self, Self::Err> {
        use anyhow::Context;
        let raw_settings: raw::Settings = serde_yaml::from_str(doc)
            .with_context(|| format!("Failed to deserialize Settings:\n{}", doc))?;
        raw_settings.try_into()
    }
}
