use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a sales enquiry. The serialized strings match the backend wire
/// format exactly.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum EnquiryStatus {
    Pending,
    #[serde(rename = "Follow Up")]
    FollowUp,
    Joined,
    Rejected,
}

impl EnquiryStatus {
    /// Terminal statuses admit no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Joined | Self::Rejected)
    }

    /// Legal transition edges: a non-terminal enquiry may move to Follow Up
    /// (re-affirming Follow Up is allowed) or to either terminal status.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        match self {
            Self::Pending | Self::FollowUp => {
                matches!(target, Self::FollowUp | Self::Joined | Self::Rejected)
            }
            Self::Joined | Self::Rejected => false,
        }
    }

    /// Reason choices offered for a transition into `target`. "Other" backs
    /// the free-text fallback and is always present.
    #[must_use]
    pub const fn allowed_reasons(target: Self) -> &'static [&'static str] {
        match target {
            Self::Pending => &["Other"],
            Self::FollowUp => &[
                "Requested callback",
                "Considering membership plans",
                "Will visit the gym again",
                "Other",
            ],
            Self::Joined => &[
                "Joined after trial session",
                "Joined on current offer",
                "Referred by a member",
                "Other",
            ],
            Self::Rejected => &[
                "Too expensive",
                "Joined another gym",
                "Location not convenient",
                "Not interested anymore",
                "Other",
            ],
        }
    }
}

impl std::fmt::Display for EnquiryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Pending => "Pending",
            Self::FollowUp => "Follow Up",
            Self::Joined => "Joined",
            Self::Rejected => "Rejected",
        };
        f.pad(name)
    }
}

impl std::str::FromStr for EnquiryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "follow-up" | "followup" | "follow up" => Ok(Self::FollowUp),
            "joined" => Ok(Self::Joined),
            "rejected" => Ok(Self::Rejected),
            _ => Err(format!("Unknown enquiry status: {s}")),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Enquiry {
    pub enquiry_id: String,
    pub name: String,
    pub contact: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    pub date: DateTime<Utc>,
    pub status: EnquiryStatus,
    #[serde(rename = "statusReason", default)]
    pub status_reason: String,
}

/// Input for a front-desk enquiry creation.
#[derive(Clone, Debug, Serialize)]
pub struct NewEnquiry {
    pub name: String,
    pub contact: String,
    pub email: Option<String>,
    pub message: Option<String>,
}

/// Authoritative list split as returned by the backend; the client never
/// re-derives this partitioning.
#[derive(Debug, Default, Deserialize)]
pub struct EnquiryList {
    #[serde(default)]
    pub incomplete_enquiries: Vec<Enquiry>,
    #[serde(default)]
    pub completed_enquiries: Vec<Enquiry>,
}
