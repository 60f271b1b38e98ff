pub mod costing;
pub mod raw;
pub mod transaction;
pub mod trip;

use anyhow::{Error, Result};
use std::convert::{TryFrom, TryInto};
use transaction::Transaction;
use trip::Trip;

/// A fully valid record from the document stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Trip(Trip),
    Transaction(Transaction),
}

impl Entry {
    pub fn id(&self) -> String {
        match self {
            Entry::Trip(trip) => trip.id(),
            Entry::Transaction(tx) => tx.id(),
        }
    }

    pub fn as_trip(&self) -> Option<&Trip> {
        match self {
            Entry::Trip(trip) => Some(trip),
            Entry::Transaction(_) => None,
        }
    }

    pub fn as_transaction(&self) -> Option<&Transaction> {
        match self {
            Entry::Trip(_) => None,
            Entry::Transaction(tx) => Some(tx),
        }
    }
}

impl TryFrom<raw::Entry> for Entry {
    type Error = Error;

    fn try_from(raw_entry: raw::Entry) -> Result<Self> {
        match raw_entry.r#type.as_str() {
            "Trip" => Ok(Entry::Trip(raw_entry.try_into()?)),
            "Income" | "Expense" => Ok(Entry::Transaction(raw_entry.try_into()?)),
            other => Err(Error::msg(format!("{} not a valid entry type", other))),
        }
    }
}
