use crate::error::{AppError, AppResult};
use crate::models::{Offer, ReadyToBuyData, WireStatus, WireVerification};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

/// Audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub timestamp: i64,
    pub event_type: String, // "ready_to_buy_submitted", "offer_created", "wire_verified"
    pub deal_id: Option<String>,
    pub contact_email: Option<String>,
    pub details: serde_json::Value,
}

/// Append-only JSON-lines trail of purchase activity
pub struct AuditTrailService {
    log_file: PathBuf,
    file_handle: Arc<Mutex<std::fs::File>>,
}

impl AuditTrailService {
    /// Create a new audit trail service
    pub fn new(log_directory: PathBuf) -> AppResult<Self> {
        // Ensure directory exists
        std::fs::create_dir_all(&log_directory)
            .map_err(|e| AppError::Message(format!("Failed to create log directory: {}", e)))?;

        // Create log file with date
        let date = chrono::Utc::now().format("%Y-%m-%d");
        let log_file = log_directory.join(format!("audit_{}.log", date));

        // Open file in append mode
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .map_err(|e| AppError::Message(format!("Failed to open audit log file: {}", e)))?;

        info!("Audit trail initialized: {:?}", log_file);

        Ok(Self {
            log_file,
            file_handle: Arc::new(Mutex::new(file)),
        })
    }

    pub fn log_file(&self) -> &Path {
        &self.log_file
    }

    /// Log an audit entry
    pub async fn log(&self, entry: AuditLogEntry) -> AppResult<()> {
        let json = serde_json::to_string(&entry)?;

        let mut file = self.file_handle.lock().await;
        writeln!(file, "{}", json)
            .map_err(|e| AppError::Message(format!("Failed to write audit log: {}", e)))?;

        file.flush()
            .map_err(|e| AppError::Message(format!("Failed to flush audit log: {}", e)))?;

        Ok(())
    }

    /// Log a completed Ready to Buy submission.
    ///
    /// The signature image itself stays out of the log.
    pub async fn log_ready_to_buy(
        &self,
        submission_id: Uuid,
        deal_id: &str,
        contact_email: &str,
        data: &ReadyToBuyData,
        wire_status: Option<WireStatus>,
    ) -> AppResult<()> {
        let buyer = &data.buyer_info;
        let entry = AuditLogEntry {
            timestamp: chrono::Utc::now().timestamp(),
            event_type: "ready_to_buy_submitted".to_string(),
            deal_id: Some(deal_id.to_string()),
            contact_email: Some(contact_email.to_string()),
            details: serde_json::json!({
                "submission_id": submission_id.to_string(),
                "buyer_type": buyer.buyer_type.map(|t| t.as_str()),
                "funding_type": buyer.funding_type.map(|t| t.as_str()),
                "buyer_name": buyer.full_name(),
                "signature_bytes": data.signature.len(),
                "wire_file": data.wire_confirmation.as_ref().map(|w| w.file_name.clone()),
                "wire_status": wire_status.map(|s| s.as_str()),
            }),
        };

        self.log(entry).await
    }

    /// Log offer creation
    pub async fn log_offer_created(&self, offer: &Offer) -> AppResult<()> {
        let entry = AuditLogEntry {
            timestamp: chrono::Utc::now().timestamp(),
            event_type: "offer_created".to_string(),
            deal_id: Some(offer.deal_id.clone()),
            contact_email: Some(offer.contact_email.clone()),
            details: serde_json::json!({
                "offer_id": offer.id,
                "amount": offer.amount.to_string(),
                "funding_type": offer.funding_type.map(|t| t.as_str()),
            }),
        };

        self.log(entry).await
    }

    /// Log a wire screenshot classification
    pub async fn log_wire_verification(
        &self,
        contact_email: &str,
        file_name: &str,
        verification: &WireVerification,
    ) -> AppResult<()> {
        let entry = AuditLogEntry {
            timestamp: chrono::Utc::now().timestamp(),
            event_type: "wire_verified".to_string(),
            deal_id: None,
            contact_email: Some(contact_email.to_string()),
            details: serde_json::json!({
                "file_name": file_name,
                "status": verification.status.as_str(),
                "status_text": verification.classification.status_text,
                "amount": verification.classification.amount,
                "reference_number": verification.classification.reference_number,
            }),
        };

        self.log(entry).await
    }
}
