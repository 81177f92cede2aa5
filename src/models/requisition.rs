use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A data-access requisition. Descriptive fields and the requester snapshot
/// are immutable after creation; only the decision fields are ever updated,
/// and always together with the status.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Requisition {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub requisition_date: Option<String>,
    pub basin: String,
    pub block: Option<String>,
    pub area: Option<String>,
    pub dimension: Option<String>,
    pub return_date: Option<String>,
    pub data_type: Option<String>,
    pub objective: Option<String>,
    pub remarks: Option<String>,
    pub requester_name: Option<String>,
    pub requester_designation: Option<String>,
    pub requester_cpf: String,
    pub requester_mobile: String,
    pub requester_group: String,
    pub requested_by_user_id: Uuid,
    pub requested_by_external_id: String,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub decided_by_user_id: Option<Uuid>,
    pub decided_by_external_id: Option<String>,
    pub decided_by_name: Option<String>,
    pub decision_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Status {
    PendingLevel2,
    Approved,
    Denied,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::PendingLevel2 => "pending_level2",
            Status::Approved => "approved",
            Status::Denied => "denied",
        }
    }

    /// A terminal outcome, as opposed to the initial pending state.
    pub fn is_decision(self) -> bool {
        matches!(self, Status::Approved | Status::Denied)
    }

    /// Display form: underscores to spaces, each word capitalized.
    pub fn humanize(self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl std::str::FromStr for Status {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending_level2" => Ok(Status::PendingLevel2),
            "approved" => Ok(Status::Approved),
            "denied" => Ok(Status::Denied),
            _ => Err(()),
        }
    }
}
