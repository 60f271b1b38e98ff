use anyhow::Result;
use futures::stream::TryStreamExt;
use haulbooks::entry::Entry;
use haulbooks::settings::{Settings, SettingsAction};
use haulbooks::summary::{Week, Window};
use haulbooks::*;
use itertools::Itertools;

const RECORDS: &str = "./tests/fixtures/records";
const SETTINGS: &str = "./tests/fixtures/settings.yml";

#[async_std::test]
async fn test_entries_have_unique_ids() -> Result<()> {
    let ledger = Ledger::new(Some(RECORDS));
    let entries: Vec<Entry> = ledger.entries().try_collect().await?;
    dbg!(&entries);
    let count = entries.iter().map(|entry| entry.id()).unique().count();
    assert_eq!(count, 7);
    Ok(())
}

#[async_std::test]
async fn test_trips_sort_by_date_with_undated_last() -> Result<()> {
    let ledger = Ledger::new(Some(RECORDS));
    let trips = ledger.trips().await?;
    let ids: Vec<String> = trips.iter().map(|trip| trip.id()).collect();
    assert_eq!(
        ids,
        vec![
            "jan-05-chi-dal",
            "3000-01-12-Trip-Dallas", // id derived from date, type, and origin
            "jan-19-slc-reno",
            "layover",
        ]
    );
    Ok(())
}

#[async_std::test]
async fn test_trip_report_rows() -> Result<()> {
    let settings = Settings::load_or_default(SETTINGS).await?;
    let ledger = Ledger::new(Some(RECORDS));
    let reports = ledger.trip_reports(&settings).await?;
    let first = &reports[0];
    assert_eq!(
        first.to_string(),
        "3000-01-05 | Chicago to Dallas            |   $1000.00 |    $325.00 |    $675.00 |   $2.00"
    );
    assert_eq!(first.costing.rent_charge.to_string(), "$200.00");
    assert_eq!(first.costing.percentage_charge.to_string(), "$100.00");
    assert_eq!(first.costing.mile_charge.to_string(), "$25.00");
    Ok(())
}

#[async_std::test]
async fn test_all_time_summary_keeps_undated_trips() -> Result<()> {
    let settings = Settings::load_or_default(SETTINGS).await?;
    let ledger = Ledger::new(Some(RECORDS));
    let summary = ledger.summary(&settings, &Window::all_time()).await?;
    dbg!(&summary);
    assert_eq!(summary.total_trips, 4);
    assert_eq!(summary.total_gross.to_string(), "$4250.50");
    assert_eq!(summary.total_miles.to_string(), "1700");
    assert_eq!(summary.total_profit.to_string(), "$3000.45");
    assert_eq!(summary.avg_rpm.to_string(), "$2.50");
    assert_eq!(summary.avg_profit_per_trip.to_string(), "$750.11");
    Ok(())
}

#[async_std::test]
async fn test_windowed_summary_excludes_undated_trips() -> Result<()> {
    let settings = Settings::load_or_default(SETTINGS).await?;
    let ledger = Ledger::new(Some(RECORDS));
    let window = Window::between(Some("3000-01-01".parse()?), Some("3000-01-15".parse()?));
    let summary = ledger.summary(&settings, &window).await?;
    assert_eq!(summary.total_trips, 2);
    assert_eq!(summary.total_gross.to_string(), "$2550.50");
    assert_eq!(summary.total_profit.to_string(), "$1731.45");
    assert_eq!(summary.avg_rpm.to_string(), "$1.99");
    Ok(())
}

#[async_std::test]
async fn test_week_summary_spans_monday_to_sunday() -> Result<()> {
    let settings = Settings::load_or_default(SETTINGS).await?;
    let ledger = Ledger::new(Some(RECORDS));
    let week = Week::containing("3000-01-05".parse()?);
    let summary = ledger.week_summary(&settings, &week).await?;
    assert_eq!(
        summary.total_trips, 1,
        "the trip seven days later falls in the next week"
    );
    assert_eq!(summary.total_gross.to_string(), "$1000.00");
    Ok(())
}

#[async_std::test]
async fn test_balance_over_budget_records() -> Result<()> {
    let ledger = Ledger::new(Some(RECORDS));
    let transactions = ledger.transactions().await?;
    let ids: Vec<String> = transactions.iter().map(|tx| tx.id()).collect();
    assert_eq!(ids, vec!["tx-rent", "tx-coffee", "tx-pay"], "newest first");

    let totals = ledger.balance().await?;
    assert_eq!(totals.balance.to_string(), "$345.50");
    assert_eq!(totals.income.to_string(), "$1200.00");
    assert_eq!(totals.expense.to_string(), "$854.50");
    Ok(())
}

#[async_std::test]
async fn test_recorded_snapshot_survives_settings_edits() -> Result<()> {
    let settings = Settings::load_or_default(SETTINGS).await?;
    let ledger = Ledger::new(Some(RECORDS));
    let reports = ledger.trip_reports(&settings).await?;
    let recorded = reports
        .iter()
        .find(|report| report.trip.id() == "jan-19-slc-reno")
        .unwrap();
    assert_eq!(
        recorded.costing.additional_expenses.to_string(),
        "$40.00",
        "disabled snapshot line stays out"
    );
    assert_eq!(recorded.costing.net_profit.to_string(), "$559.00");

    // cranking up live expense lines must not shift the recorded trip
    let edited = settings
        .apply(SettingsAction::ToggleExpense("Tolls".into()))
        .apply(SettingsAction::SetExpenseAmount("Tolls".into(), "$400".parse()?));
    let reports = ledger.trip_reports(&edited).await?;
    let recorded_again = reports
        .iter()
        .find(|report| report.trip.id() == "jan-19-slc-reno")
        .unwrap();
    assert_eq!(recorded_again.costing.net_profit, recorded.costing.net_profit);
    Ok(())
}
