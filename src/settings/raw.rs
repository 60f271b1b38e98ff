use crate::money::Figure;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// Raw settings doc as deserialized from yaml.
#[skip_serializing_none]
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    pub nickname: Option<String>,
    pub rent_per_week: Option<Figure>,
    pub percentage_from_gross: Option<Figure>,
    pub rate_per_mile: Option<Figure>,
    pub expenses: Option<Vec<Line>>,
    pub custom_expenses: Option<Vec<Line>>,
}

/// One deductible cost line as stored in settings or in a trip snapshot.
#[skip_serializing_none]
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Line {
    pub id: Option<String>, // custom lines only
    pub name: String,
    pub enabled: Option<bool>, // missing means enabled
    pub amount: Option<Figure>,
}

/// Expense configuration snapshot carried by a recorded trip.
#[skip_serializing_none]
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, Default)]
pub struct Snapshot {
    pub standard: Option<Vec<Line>>,
    pub custom: Option<Vec<Line>>,
}
