use chrono::{DateTime, Duration, Utc};

use crate::enquiry::{Enquiry, EnquiryStatus};

/// Date bucket for display filtering, measured against the enquiry creation
/// time.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum DateFilter {
    #[default]
    All,
    Today,
    Last7Days,
    Last30Days,
}

impl std::str::FromStr for DateFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "today" => Ok(Self::Today),
            "week" => Ok(Self::Last7Days),
            "month" => Ok(Self::Last30Days),
            _ => Err(format!("Unknown date filter: {s} (expected all, today, week or month)")),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(EnquiryStatus),
}

/// Display-only filter over one partition. The authoritative records are
/// never mutated; filtering returns references in their original order.
#[derive(Clone, Debug, Default)]
pub struct EnquiryFilter {
    pub search: Option<String>,
    pub date: DateFilter,
    pub status: StatusFilter,
}

impl EnquiryFilter {
    #[must_use]
    pub fn apply<'a>(&self, enquiries: &'a [Enquiry], now: DateTime<Utc>) -> Vec<&'a Enquiry> {
        enquiries
            .iter()
            .filter(|e| self.matches_status(e))
            .filter(|e| self.matches_date(e, now))
            .filter(|e| self.matches_search(e))
            .collect()
    }

    fn matches_status(&self, enquiry: &Enquiry) -> bool {
        match self.status {
            StatusFilter::All => true,
            StatusFilter::Only(status) => enquiry.status == status,
        }
    }

    fn matches_date(&self, enquiry: &Enquiry, now: DateTime<Utc>) -> bool {
        match self.date {
            DateFilter::All => true,
            DateFilter::Today => enquiry.date.date_naive() == now.date_naive(),
            DateFilter::Last7Days => enquiry.date >= now - Duration::days(7),
            DateFilter::Last30Days => enquiry.date >= now - Duration::days(30),
        }
    }

    fn matches_search(&self, enquiry: &Enquiry) -> bool {
        match self.search.as_deref() {
            None | Some("") => true,
            Some(query) => {
                let query = query.to_lowercase();
                enquiry.name.to_lowercase().contains(&query)
                    || enquiry.contact.to_lowercase().contains(&query)
            }
        }
    }
}
