use crate::crm::{CrmRecord, CrmStore, Filter, SearchRequest};
use crate::error::{CrmError, CrmResult};
use crate::models::{EngagementEvent, FundingType, NewOffer, Offer};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

const OFFER_PROPERTIES: &[&str] = &[
    "deal_id",
    "contact_email",
    "amount",
    "funding_type",
    "notes",
    "submitted_at",
];

/// Repository for engagement events and offers written to the CRM
pub struct EngagementRepository {
    store: Arc<dyn CrmStore>,
    engagement_object: String,
    offer_object: String,
}

impl EngagementRepository {
    /// Create a new EngagementRepository
    pub fn new(
        store: Arc<dyn CrmStore>,
        engagement_object: impl Into<String>,
        offer_object: impl Into<String>,
    ) -> Self {
        Self {
            store,
            engagement_object: engagement_object.into(),
            offer_object: offer_object.into(),
        }
    }

    /// Record a portal engagement event
    pub async fn record(&self, event: EngagementEvent) -> CrmResult<EngagementEvent> {
        let mut properties = HashMap::new();
        properties.insert("deal_id".to_string(), event.deal_id.clone());
        properties.insert("contact_email".to_string(), event.contact_email.clone());
        properties.insert("event_type".to_string(), event.kind.as_str().to_string());
        properties.insert("occurred_at".to_string(), event.occurred_at.to_rfc3339());
        if !event.metadata.is_null() {
            properties.insert("metadata".to_string(), event.metadata.to_string());
        }

        let record = self.store.create(&self.engagement_object, properties).await?;

        Ok(EngagementEvent {
            id: Some(record.id),
            ..event
        })
    }

    /// Create an offer on a deal
    pub async fn create_offer(
        &self,
        deal_id: &str,
        contact_email: &str,
        offer: &NewOffer,
    ) -> CrmResult<Offer> {
        if offer.amount <= Decimal::ZERO {
            return Err(CrmError::InvalidInput("Offer amount must be positive".to_string()));
        }

        let created_at = Utc::now();
        let mut properties = HashMap::new();
        properties.insert("deal_id".to_string(), deal_id.to_string());
        properties.insert("contact_email".to_string(), contact_email.to_string());
        properties.insert("amount".to_string(), offer.amount.to_string());
        properties.insert("submitted_at".to_string(), created_at.to_rfc3339());
        if let Some(funding) = offer.funding_type {
            properties.insert("funding_type".to_string(), funding.as_str().to_string());
        }
        if let Some(notes) = offer.notes.as_deref().filter(|n| !n.trim().is_empty()) {
            properties.insert("notes".to_string(), notes.to_string());
        }

        let record = self.store.create(&self.offer_object, properties).await?;

        Ok(Offer {
            id: record.id,
            deal_id: deal_id.to_string(),
            contact_email: contact_email.to_string(),
            amount: offer.amount,
            funding_type: offer.funding_type,
            notes: offer.notes.clone(),
            created_at,
        })
    }

    /// Offers a contact has made on a deal
    pub async fn find_offers(&self, deal_id: &str, contact_email: &str) -> Vec<Offer> {
        let request = SearchRequest::new(OFFER_PROPERTIES)
            .filter(Filter::eq("deal_id", deal_id))
            .filter(Filter::eq("contact_email", contact_email));

        match self.store.search(&self.offer_object, &request).await {
            Ok(records) => records.iter().filter_map(offer_from_record).collect(),
            Err(e) => {
                warn!("Offer search for deal {} failed: {}", deal_id, e);
                Vec::new()
            }
        }
    }
}

fn offer_from_record(record: &CrmRecord) -> Option<Offer> {
    Some(Offer {
        id: record.id.clone(),
        deal_id: record.get_string("deal_id")?,
        contact_email: record.get_string("contact_email")?,
        amount: record.get_decimal("amount")?,
        funding_type: match record.get("funding_type") {
            Some("cash") => Some(FundingType::Cash),
            Some("hard_money") => Some(FundingType::HardMoney),
            _ => None,
        },
        notes: record.get_string("notes"),
        created_at: record
            .get("submitted_at")
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(Utc::now),
    })
}
