//! Wire transfer screenshot verification.
//!
//! One prompt, one answer: the screenshot goes to a multimodal model that is
//! asked for strict JSON, and the JSON decides the status. An answer that
//! cannot be parsed is treated as "not a wire transfer" rather than an error.

use crate::config::AiConfig;
use crate::error::{AppError, AppResult};
use crate::models::{WireClassification, WireVerification};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Content types accepted for wire confirmations
pub const ALLOWED_CONTENT_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/jpg",
    "image/webp",
    "image/gif",
    "application/pdf",
];

pub const CLASSIFICATION_PROMPT: &str = r#"You are reviewing a screenshot uploaded as proof of a wire transfer for a real estate purchase.
Respond with ONLY a JSON object, no markdown and no commentary, using exactly these keys:
{
  "isWireTransfer": boolean,      // true only if this is a bank wire transfer confirmation
  "statusText": string | null,    // the transfer status exactly as shown, e.g. "Sent", "Completed", "Confirmed", "Pending"
  "amount": string | null,
  "date": string | null,
  "senderName": string | null,
  "recipientName": string | null,
  "bankName": string | null,
  "referenceNumber": string | null // confirmation, reference, or Fed number
}
If the image is not a wire transfer confirmation, set "isWireTransfer" to false and every other field to null."#;

/// An uploaded file held in memory
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl UploadedFile {
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.content_type, STANDARD.encode(&self.data))
    }
}

/// Reject files that cannot be a wire screenshot before paying for a model call
pub fn validate_upload(file: &UploadedFile, max_bytes: usize) -> AppResult<()> {
    let content_type = file.content_type.trim().to_lowercase();
    if !ALLOWED_CONTENT_TYPES.contains(&content_type.as_str()) {
        return Err(AppError::InvalidFileType(file.content_type.clone()));
    }
    if file.data.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }
    if file.data.len() > max_bytes {
        return Err(AppError::FileTooLarge {
            size: file.data.len(),
            max: max_bytes,
        });
    }
    Ok(())
}

/// Read the model's answer. Never fails.
pub fn parse_classification(raw: &str) -> WireClassification {
    // Models like to wrap JSON in a fenced block despite instructions
    let candidate = match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if end > start => &raw[start..=end],
        _ => {
            warn!("Wire classification had no JSON object");
            return WireClassification::unknown();
        }
    };

    match serde_json::from_str::<WireClassification>(candidate) {
        Ok(classification) => classification,
        Err(e) => {
            warn!("Wire classification was not valid JSON: {}", e);
            WireClassification::unknown()
        }
    }
}

/// Something that can look at a document and answer the classification prompt
#[async_trait]
pub trait DocumentClassifier: Send + Sync {
    /// Raw model text for `prompt` applied to `file`
    async fn classify(&self, prompt: &str, file: &UploadedFile) -> AppResult<String>;
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// OpenAI-compatible chat completions client with an inline image
pub struct ChatCompletionsClassifier {
    config: AiConfig,
    http: Client,
}

impl ChatCompletionsClassifier {
    pub fn new(config: AiConfig, http: Client) -> Self {
        Self { config, http }
    }
}

#[async_trait]
impl DocumentClassifier for ChatCompletionsClassifier {
    async fn classify(&self, prompt: &str, file: &UploadedFile) -> AppResult<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Config("AI_API_KEY is not set".to_string()))?;

        let body = serde_json::json!({
            "model": self.config.model,
            "temperature": 0,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": prompt },
                    { "type": "image_url", "image_url": { "url": file.data_url() } }
                ]
            }]
        });

        let response = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("AI request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "AI service returned {}: {}",
                status, text
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("AI response unreadable: {}", e)))?;

        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }
}

/// Upload checks plus classification
pub struct WireVerificationService {
    classifier: Arc<dyn DocumentClassifier>,
    max_upload_bytes: usize,
}

impl WireVerificationService {
    pub fn new(classifier: Arc<dyn DocumentClassifier>, max_upload_bytes: usize) -> Self {
        Self {
            classifier,
            max_upload_bytes,
        }
    }

    /// Verify a wire confirmation upload
    pub async fn verify(&self, file: &UploadedFile) -> AppResult<WireVerification> {
        validate_upload(file, self.max_upload_bytes)?;

        let raw = self.classifier.classify(CLASSIFICATION_PROMPT, file).await?;
        let verification = WireVerification::from(parse_classification(&raw));

        info!(
            "Wire upload {} classified as {}",
            file.file_name,
            verification.status.as_str()
        );
        Ok(verification)
    }
}
