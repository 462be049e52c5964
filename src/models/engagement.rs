use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Kinds of portal activity recorded against a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementKind {
    DealViewed,
    CalculatorUsed,
    ReadyToBuyStarted,
    ReadyToBuySubmitted,
    WireUploaded,
    OfferSubmitted,
}

impl EngagementKind {
    /// Convert to CRM property value
    pub fn as_str(&self) -> &'static str {
        match self {
            EngagementKind::DealViewed => "deal_viewed",
            EngagementKind::CalculatorUsed => "calculator_used",
            EngagementKind::ReadyToBuyStarted => "ready_to_buy_started",
            EngagementKind::ReadyToBuySubmitted => "ready_to_buy_submitted",
            EngagementKind::WireUploaded => "wire_uploaded",
            EngagementKind::OfferSubmitted => "offer_submitted",
        }
    }
}

/// Portal activity written to the CRM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementEvent {
    pub id: Option<String>,
    pub deal_id: String,
    pub contact_email: String,
    pub kind: EngagementKind,
    pub occurred_at: DateTime<Utc>,
    pub metadata: serde_json::Value,
}

impl EngagementEvent {
    pub fn new(deal_id: &str, contact_email: &str, kind: EngagementKind) -> Self {
        Self {
            id: None,
            deal_id: deal_id.to_string(),
            contact_email: contact_email.to_string(),
            kind,
            occurred_at: Utc::now(),
            metadata: serde_json::Value::Null,
        }
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Offer request from the portal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOffer {
    pub amount: Decimal,
    pub funding_type: Option<super::FundingType>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Offer as created in the CRM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub id: String,
    pub deal_id: String,
    pub contact_email: String,
    pub amount: Decimal,
    pub funding_type: Option<super::FundingType>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}
