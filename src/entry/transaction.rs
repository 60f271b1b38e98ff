use super::raw;
use crate::money::Money;
use anyhow::{Context, Error, Result, bail};
use chrono::{NaiveDate, NaiveDateTime};
use std::convert::TryFrom;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxKind {
    Income,
    Expense,
}

/// A budget ledger transaction. The stored amount is signed: positive for
/// income, negative for expense.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    id: String,
    pub description: String,
    pub amount: Money,
    pub kind: TxKind,
    pub created_at: Option<NaiveDateTime>,
}

impl Transaction {
    pub fn id(&self) -> String {
        self.id.clone()
    }
}

const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            text.parse::<NaiveDate>()
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

impl TryFrom<raw::Entry> for Transaction {
    type Error = Error;

    fn try_from(raw_entry: raw::Entry) -> Result<Self> {
        let kind = match raw_entry.r#type.as_str() {
            "Income" => TxKind::Income,
            "Expense" => TxKind::Expense,
            other => bail!("{} is not a transaction type", other),
        };
        let magnitude = Money(Money::lenient(raw_entry.amount.as_ref()).0.abs());
        let amount = match kind {
            TxKind::Income => magnitude,
            TxKind::Expense => -magnitude,
        };
        Ok(Transaction {
            id: raw_entry.id.context("Id missing!")?,
            description: raw_entry.description.unwrap_or_default(),
            amount,
            kind,
            created_at: raw_entry.created_at.as_deref().and_then(parse_timestamp),
        })
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = match self.kind {
            TxKind::Income => '+',
            TxKind::Expense => '-',
        };
        let magnitude = Money(self.amount.0.abs());
        write!(f, "{}{:>10} | {}", sign, magnitude.to_string(), self.description)
    }
}

/// Budget roll-up: net balance, total income, and total spend (reported as
/// a positive figure).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Balance {
    pub balance: Money,
    pub income: Money,
    pub expense: Money,
}

impl Balance {
    pub fn of<'a, I>(transactions: I) -> Balance
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        transactions
            .into_iter()
            .fold(Balance::default(), |mut totals, tx| {
                totals.balance += tx.amount;
                if tx.amount.is_negative() {
                    totals.expense += -tx.amount;
                } else {
                    totals.income += tx.amount;
                }
                totals
            })
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<10} {:>12}", "Balance", self.balance.to_string())?;
        writeln!(f, "{:<10} {:>12}", "Income", self.income.to_string())?;
        write!(f, "{:<10} {:>12}", "Expenses", self.expense.to_string())
    }
}
