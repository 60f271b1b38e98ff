pub mod docs;
pub mod entry;
pub mod money;
pub mod receipt;
pub mod settings;
pub mod store;
pub mod summary;

use anyhow::{Context, Error, Result};
use entry::Entry;
use entry::raw;
use entry::transaction::{Balance, Transaction};
use entry::trip::Trip;
use futures::stream::{Stream, TryStreamExt};
use settings::Settings;
use std::borrow::ToOwned;
use std::convert::TryInto;
use summary::{Summary, TripReport, Week, Window};

/// Reads trip and budget records from a dir, file, or stdin and serves the
/// derived views over them.
pub struct Ledger {
    path: Option<String>,
}

impl Ledger {
    /// A `None` path reads records from stdin.
    pub fn new(path: Option<&str>) -> Self {
        Ledger {
            path: path.map(ToOwned::to_owned),
        }
    }

    /// Streams validated entries from the record docs.
    pub fn entries(&self) -> impl Stream<Item = Result<Entry>> + '_ {
        docs::docs(self.path.clone())
            .map_err(|err: std::io::Error| Error::new(err)) // map to anyhow::Error from here on
            .and_then(|doc: String| async move {
                let mut raw_entry: raw::Entry = serde_yaml::from_str(doc.as_str())
                    .context(format!("Failed to deserialize entry:\n{:?}", doc))?;
                let fallback_id = format!(
                    "{}-{}-{}",
                    raw_entry.date.clone().unwrap_or_default(),
                    raw_entry.r#type,
                    raw_entry
                        .from_location
                        .clone()
                        .or_else(|| raw_entry.description.clone())
                        .unwrap_or_default(),
                );
                raw_entry.id.get_or_insert(fallback_id);
                let entry: Entry = raw_entry.try_into()?;
                Ok(entry)
            })
    }

    /// Trips sorted by date; trips whose date never parsed sort last.
    pub async fn trips(&self) -> Result<Vec<Trip>> {
        let mut trips: Vec<Trip> = self
            .entries()
            .try_filter_map(|entry| async move {
                Ok(match entry {
                    Entry::Trip(trip) => Some(trip),
                    Entry::Transaction(_) => None,
                })
            })
            .try_collect()
            .await?;
        trips.sort_by_key(|trip| (trip.date.is_none(), trip.date, trip.date_text.clone()));
        Ok(trips)
    }

    /// Trips with their cost breakdowns computed against the given settings
    /// (each trip's own snapshot still wins where present).
    pub async fn trip_reports(&self, settings: &Settings) -> Result<Vec<TripReport>> {
        Ok(self
            .trips()
            .await?
            .into_iter()
            .map(|trip| TripReport::new(trip, settings))
            .collect())
    }

    pub async fn summary(&self, settings: &Settings, window: &Window) -> Result<Summary> {
        Ok(Summary::of(&self.trip_reports(settings).await?, window))
    }

    pub async fn week_summary(&self, settings: &Settings, week: &Week) -> Result<Summary> {
        self.summary(settings, &week.window()).await
    }

    /// Budget transactions, newest first.
    pub async fn transactions(&self) -> Result<Vec<Transaction>> {
        let mut transactions: Vec<Transaction> = self
            .entries()
            .try_filter_map(|entry| async move {
                Ok(match entry {
                    Entry::Transaction(tx) => Some(tx),
                    Entry::Trip(_) => None,
                })
            })
            .try_collect()
            .await?;
        transactions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(transactions)
    }

    pub async fn balance(&self) -> Result<Balance> {
        Ok(Balance::of(&self.transactions().await?))
    }
}
