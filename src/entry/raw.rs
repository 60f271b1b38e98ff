use crate::money::Figure;
use crate::settings::raw::Snapshot;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// Raw record doc as deserialized from yaml; `type` picks the variant.
#[skip_serializing_none]
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, Default)]
pub struct Entry {
    pub id: Option<String>, // if not specified derived from other fields
    pub r#type: String,
    pub date: Option<String>,
    // trip fields
    pub days_in_trip: Option<Figure>,
    pub from_location: Option<String>,
    pub to_location: Option<String>,
    pub gross: Option<Figure>,
    pub miles: Option<Figure>,
    pub notes: Option<String>,
    pub expenses: Option<Snapshot>,
    // budget transaction fields
    pub description: Option<String>,
    pub amount: Option<Figure>,
    pub created_at: Option<String>,
}
