use serde::{Deserialize, Serialize};

/// Bank status labels that count as money having left the buyer's account
pub const ACCEPTED_STATUS_TEXT: [&str; 3] = ["Sent", "Completed", "Confirmed"];

/// Outcome of checking a wire confirmation screenshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireStatus {
    Verified,
    Pending,
    Invalid,
}

impl WireStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WireStatus::Verified => "verified",
            WireStatus::Pending => "pending",
            WireStatus::Invalid => "invalid",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "verified" => Some(WireStatus::Verified),
            "pending" => Some(WireStatus::Pending),
            "invalid" => Some(WireStatus::Invalid),
            _ => None,
        }
    }
}

/// What the model read off the screenshot.
///
/// Field names follow the JSON the model is asked to return.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WireClassification {
    pub is_wire_transfer: bool,
    pub status_text: Option<String>,
    pub amount: Option<String>,
    pub date: Option<String>,
    pub sender_name: Option<String>,
    pub recipient_name: Option<String>,
    pub bank_name: Option<String>,
    pub reference_number: Option<String>,
}

impl WireClassification {
    /// Result used when the model's answer cannot be read
    pub fn unknown() -> Self {
        Self {
            is_wire_transfer: false,
            status_text: Some("Unknown".to_string()),
            ..Self::default()
        }
    }

    pub fn status(&self) -> WireStatus {
        if !self.is_wire_transfer {
            return WireStatus::Invalid;
        }
        match self.status_text.as_deref().map(str::trim) {
            Some(text) if ACCEPTED_STATUS_TEXT.iter().any(|s| s.eq_ignore_ascii_case(text)) => {
                WireStatus::Verified
            }
            _ => WireStatus::Pending,
        }
    }
}

/// Classification plus the status derived from it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireVerification {
    pub status: WireStatus,
    pub verified: bool,
    pub classification: WireClassification,
}

impl From<WireClassification> for WireVerification {
    fn from(classification: WireClassification) -> Self {
        let status = classification.status();
        Self {
            status,
            verified: status == WireStatus::Verified,
            classification,
        }
    }
}
