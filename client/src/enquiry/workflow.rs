use serde_json::json;
use thiserror::Error;

use crate::api;
use crate::enquiry::{Enquiry, EnquiryList, EnquiryStatus, NewEnquiry};

#[rustfmt::skip]
#[derive(Debug, Error)]
pub enum EnquiryError {
    #[error("API error: {0}")]
    Api(#[from] api::ApiError),

    #[error("A non-empty reason is required to move an enquiry to {0}")]
    ReasonRequired(EnquiryStatus),

    #[error("Illegal status transition from {from} to {to}")]
    IllegalTransition { from: EnquiryStatus, to: EnquiryStatus },
}

/// Client-side view of one gym's enquiries: the authoritative partitions as
/// last fetched from the backend, plus the operations that mutate them
/// remotely. Every successful mutation refetches the list.
pub struct Enquiries {
    api: api::ApiClient,
    gym_id: String,
    pending: Vec<Enquiry>,
    completed: Vec<Enquiry>,
}

impl Enquiries {
    #[must_use]
    pub const fn new(api: api::ApiClient, gym_id: String) -> Self {
        Self {
            api,
            gym_id,
            pending: Vec::new(),
            completed: Vec::new(),
        }
    }

    /// Enquiries still in play (Pending or Follow Up).
    #[must_use]
    pub fn pending(&self) -> &[Enquiry] {
        &self.pending
    }

    /// Enquiries in a terminal status (Joined or Rejected).
    #[must_use]
    pub fn completed(&self) -> &[Enquiry] {
        &self.completed
    }

    /// Replaces both partitions with the authoritative list from the backend.
    pub async fn fetch(&mut self) -> Result<(), EnquiryError> {
        let request = api::ApiRequest::get("/owner/gym-enquiries").query("gym_id", &self.gym_id);
        let list: EnquiryList = self.api.send_json(request).await?;
        self.pending = list.incomplete_enquiries;
        self.completed = list.completed_enquiries;
        Ok(())
    }

    /// Records a new enquiry. New records always start Pending with an empty
    /// reason.
    pub async fn create(&mut self, new: NewEnquiry) -> Result<(), EnquiryError> {
        let request = api::ApiRequest::post("/owner/gym-enquiries").json(json!({
            "gym_id": self.gym_id,
            "data": {
                "name": new.name,
                "contact": new.contact,
                "email": new.email,
                "message": new.message,
                "status": EnquiryStatus::Pending,
                "statusReason": "",
            },
        }));
        self.api.send(request).await?;
        self.fetch().await
    }

    /// Moves an enquiry to `target` with the given reason, then refetches.
    ///
    /// An id that is not in the pending partition is skipped without a
    /// remote call; the UI cannot normally reach that state.
    pub async fn update_status(
        &mut self,
        enquiry_id: &str,
        target: EnquiryStatus,
        reason: &str,
    ) -> Result<(), EnquiryError> {
        let Some(current) = self.pending.iter().find(|e| e.enquiry_id == enquiry_id) else {
            tracing::warn!(enquiry_id, "Status update for unknown enquiry, skipping");
            return Ok(());
        };

        if reason.trim().is_empty() {
            return Err(EnquiryError::ReasonRequired(target));
        }
        if !current.status.can_transition_to(target) {
            return Err(EnquiryError::IllegalTransition { from: current.status, to: target });
        }

        let request = api::ApiRequest::put("/owner/update-enquiry-status").json(json!({
            "enquiry_id": enquiry_id,
            "gym_id": self.gym_id,
            "status": target,
            "statusReason": reason,
        }));
        self.api.send(request).await?;
        self.fetch().await
    }
}
