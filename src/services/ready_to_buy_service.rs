use crate::auth::verify_wire_token;
use crate::error::{AppError, AppResult};
use crate::models::{EngagementEvent, EngagementKind, ReadyToBuyData, WireStatus};
use crate::repositories::{DealRepository, EngagementRepository};
use crate::services::AuditTrailService;
use crate::wizard::{ReadyToBuyWizard, WizardStep};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// What the confirmation step shows
#[derive(Debug, Clone, Serialize)]
pub struct ReadyToBuyReceipt {
    pub submission_id: Uuid,
    pub deal_id: String,
    pub step: u8,
    pub wire_status: Option<WireStatus>,
    pub submitted_at: DateTime<Utc>,
}

/// Accepts completed Ready to Buy flows
pub struct ReadyToBuyService {
    deal_repo: Arc<DealRepository>,
    engagement_repo: Arc<EngagementRepository>,
    audit: Option<Arc<AuditTrailService>>,
    signing_secret: String,
}

impl ReadyToBuyService {
    pub fn new(
        deal_repo: Arc<DealRepository>,
        engagement_repo: Arc<EngagementRepository>,
        audit: Option<Arc<AuditTrailService>>,
        signing_secret: impl Into<String>,
    ) -> Self {
        Self {
            deal_repo,
            engagement_repo,
            audit,
            signing_secret: signing_secret.into(),
        }
    }

    /// Wire status the server itself signed for this contact's upload
    fn wire_status(&self, contact_email: &str, data: &ReadyToBuyData) -> Option<WireStatus> {
        let upload = data.wire_confirmation.as_ref()?;
        let token = upload.verification_token.as_deref()?;
        let status = verify_wire_token(&self.signing_secret, contact_email, &upload.file_name, token);
        if status.is_none() {
            warn!(
                "Ignoring wire verification token that does not match upload {}",
                upload.file_name
            );
        }
        status
    }

    /// Validate a submission against the wizard rules and hand it to the CRM
    pub async fn submit(
        &self,
        deal_id: &str,
        contact_email: &str,
        data: ReadyToBuyData,
    ) -> AppResult<ReadyToBuyReceipt> {
        info!("Ready to Buy submission: deal={}, contact={}", deal_id, contact_email);

        let deal = self
            .deal_repo
            .find_by_id(deal_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Deal {} not found", deal_id)))?;

        if !deal.is_active() {
            return Err(AppError::Validation(
                "This deal is no longer available".to_string(),
            ));
        }

        let wizard = ReadyToBuyWizard::replay(&data)
            .map_err(|e| AppError::Validation(e.to_string()))?;
        debug_assert_eq!(wizard.step(), WizardStep::Confirmation);

        let submission_id = Uuid::new_v4();
        let wire_status = self.wire_status(contact_email, &data);

        let event = EngagementEvent::new(&deal.id, contact_email, EngagementKind::ReadyToBuySubmitted)
            .with_metadata(serde_json::json!({
                "submission_id": submission_id.to_string(),
                "buyer_type": data.buyer_info.buyer_type.map(|t| t.as_str()),
                "funding_type": data.buyer_info.funding_type.map(|t| t.as_str()),
                "buyer_name": data.buyer_info.full_name(),
                "buyer_phone": data.buyer_info.phone,
                "wire_file": data.wire_confirmation.as_ref().map(|w| w.file_name.clone()),
                "wire_status": wire_status.map(|s| s.as_str()),
            }));
        let event = self.engagement_repo.record(event).await?;

        if let Some(audit) = &self.audit {
            if let Err(e) = audit
                .log_ready_to_buy(submission_id, &deal.id, contact_email, &data, wire_status)
                .await
            {
                warn!("Failed to audit Ready to Buy submission {}: {}", submission_id, e);
            }
        }

        info!(
            "Ready to Buy submission {} recorded as CRM engagement {:?}",
            submission_id, event.id
        );

        Ok(ReadyToBuyReceipt {
            submission_id,
            deal_id: deal.id,
            step: wizard.step().number(),
            wire_status,
            submitted_at: event.occurred_at,
        })
    }
}
