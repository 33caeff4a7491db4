//! Social-pressure filter records: daily metric scores, the exit policy and
//! the worry window.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricScore {
    /// 0 or 1.
    pub score: u8,
    #[serde(alias = "ts")]
    pub timestamp: u64,
}

/// Free-text inputs to a generated policy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyFields {
    pub will_do: String,
    pub wont_do: String,
    pub exit_date: String,
    pub notice_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredPolicy")]
pub struct Policy {
    pub will_do: String,
    pub wont_do: String,
    pub exit_date: String,
    pub notice_date: String,
    pub chosen_script_id: Option<String>,
    pub generated_at: u64,
}

/// On-disk policy shape. Older records kept the chosen script as the single
/// element of a `scripts` list.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredPolicy {
    #[serde(default)]
    will_do: String,
    #[serde(default)]
    wont_do: String,
    #[serde(default)]
    exit_date: String,
    #[serde(default)]
    notice_date: String,
    #[serde(default)]
    chosen_script_id: Option<String>,
    #[serde(default)]
    scripts: Vec<String>,
    #[serde(default, alias = "generated")]
    generated_at: u64,
}

impl From<StoredPolicy> for Policy {
    fn from(stored: StoredPolicy) -> Self {
        let chosen_script_id = stored
            .chosen_script_id
            .or_else(|| stored.scripts.into_iter().next())
            .filter(|id| !id.is_empty());
        Self {
            will_do: stored.will_do,
            wont_do: stored.wont_do,
            exit_date: stored.exit_date,
            notice_date: stored.notice_date,
            chosen_script_id,
            generated_at: stored.generated_at,
        }
    }
}

impl Policy {
    pub fn new(fields: PolicyFields, chosen_script_id: Option<String>, generated_at: u64) -> Self {
        Self {
            will_do: fields.will_do,
            wont_do: fields.wont_do,
            exit_date: fields.exit_date,
            notice_date: fields.notice_date,
            chosen_script_id,
            generated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorryEntry {
    pub text: String,
    pub date: NaiveDate,
    #[serde(alias = "ts")]
    pub timestamp: u64,
}
