use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One social risk taken. Each occurrence earns its scenario's XP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskEvent {
    pub id: String,
    pub date: NaiveDate,
    #[serde(alias = "ts")]
    pub timestamp: u64,
    pub scenario_id: String,
}
