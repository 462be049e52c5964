use crate::models::BuyerInfo;
use serde::{Deserialize, Serialize};

/// Metadata for the uploaded wire confirmation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireUpload {
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: usize,
    /// Signed status handed out by the wire verification endpoint
    #[serde(default)]
    pub verification_token: Option<String>,
}

impl WireUpload {
    pub fn is_empty(&self) -> bool {
        self.file_name.trim().is_empty() || self.size_bytes == 0
    }
}

/// Everything collected by the Ready to Buy flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadyToBuyData {
    pub buyer_info: BuyerInfo,
    /// Signature pad output as a `data:image/...` URL
    pub signature: String,
    pub wire_confirmation: Option<WireUpload>,
}
