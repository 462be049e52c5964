use crate::error::{AppError, AppResult};
use crate::models::{EngagementEvent, EngagementKind, NewOffer, Offer};
use crate::repositories::{DealRepository, EngagementRepository};
use crate::services::AuditTrailService;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, warn};

/// Service for engagement tracking and offers
pub struct EngagementService {
    deal_repo: Arc<DealRepository>,
    engagement_repo: Arc<EngagementRepository>,
    audit: Option<Arc<AuditTrailService>>,
}

impl EngagementService {
    pub fn new(
        deal_repo: Arc<DealRepository>,
        engagement_repo: Arc<EngagementRepository>,
        audit: Option<Arc<AuditTrailService>>,
    ) -> Self {
        Self {
            deal_repo,
            engagement_repo,
            audit,
        }
    }

    /// Record portal activity on a deal
    pub async fn track(
        &self,
        deal_id: &str,
        contact_email: &str,
        kind: EngagementKind,
        metadata: serde_json::Value,
    ) -> AppResult<EngagementEvent> {
        let event = EngagementEvent::new(deal_id, contact_email, kind).with_metadata(metadata);
        let event = self.engagement_repo.record(event).await?;
        info!("Tracked {} on deal {} for {}", kind.as_str(), deal_id, contact_email);
        Ok(event)
    }

    /// Create an offer on an active deal
    pub async fn create_offer(
        &self,
        deal_id: &str,
        contact_email: &str,
        offer: NewOffer,
    ) -> AppResult<Offer> {
        if offer.amount <= Decimal::ZERO {
            return Err(AppError::Validation("Offer amount must be positive".to_string()));
        }

        let deal = self
            .deal_repo
            .find_by_id(deal_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Deal {} not found", deal_id)))?;

        if !deal.is_active() {
            return Err(AppError::Validation(
                "This deal is no longer accepting offers".to_string(),
            ));
        }

        let offer = self
            .engagement_repo
            .create_offer(&deal.id, contact_email, &offer)
            .await?;

        // Offer tracking is best effort once the offer exists
        let event = EngagementEvent::new(&deal.id, contact_email, EngagementKind::OfferSubmitted)
            .with_metadata(serde_json::json!({
                "offer_id": offer.id,
                "amount": offer.amount.to_string(),
            }));
        if let Err(e) = self.engagement_repo.record(event).await {
            warn!("Failed to track offer {}: {}", offer.id, e);
        }

        if let Some(audit) = &self.audit {
            if let Err(e) = audit.log_offer_created(&offer).await {
                warn!("Failed to audit offer {}: {}", offer.id, e);
            }
        }

        info!("Created offer {} on deal {}", offer.id, deal.id);
        Ok(offer)
    }

    /// Offers the contact has already made on a deal
    pub async fn offers_for(&self, deal_id: &str, contact_email: &str) -> Vec<Offer> {
        self.engagement_repo.find_offers(deal_id, contact_email).await
    }
}
