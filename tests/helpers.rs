#![allow(dead_code)]

use async_trait::async_trait;
use dealroom_backend::auth::create_session_token;
use dealroom_backend::config::AppConfig;
use dealroom_backend::crm::{CrmRecord, CrmStore, SearchRequest};
use dealroom_backend::error::{AppResult, CrmError, CrmResult};
use dealroom_backend::models::*;
use dealroom_backend::services::{AuditTrailService, DocumentClassifier, UploadedFile};
use dealroom_backend::AppState;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

pub const INVESTOR_EMAIL: &str = "investor@example.com";
pub const ACTIVE_DEAL_ID: &str = "deal-1";
pub const SOLD_DEAL_ID: &str = "deal-2";
pub const SIGNATURE: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAE=";

/// CRM object store held in memory, keyed by object type
#[derive(Default)]
pub struct InMemoryCrm {
    objects: RwLock<HashMap<String, Vec<CrmRecord>>>,
    files: RwLock<HashMap<String, String>>,
    next_id: AtomicU64,
    failing: AtomicBool,
}

impl InMemoryCrm {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1000),
            ..Self::default()
        }
    }

    pub async fn insert(&self, object_type: &str, record: CrmRecord) {
        self.objects
            .write()
            .await
            .entry(object_type.to_string())
            .or_default()
            .push(record);
    }

    pub async fn insert_file(&self, file_id: &str, url: &str) {
        self.files
            .write()
            .await
            .insert(file_id.to_string(), url.to_string());
    }

    pub async fn records(&self, object_type: &str) -> Vec<CrmRecord> {
        self.objects
            .read()
            .await
            .get(object_type)
            .cloned()
            .unwrap_or_default()
    }

    /// Make every call fail the way an unreachable CRM would
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> CrmResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CrmError::Status {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CrmStore for InMemoryCrm {
    async fn search(&self, object_type: &str, request: &SearchRequest) -> CrmResult<Vec<CrmRecord>> {
        self.check()?;
        Ok(self
            .records(object_type)
            .await
            .into_iter()
            .filter(|r| request.matches(r))
            .take(request.limit)
            .collect())
    }

    async fn get(
        &self,
        object_type: &str,
        id: &str,
        _properties: &[&str],
    ) -> CrmResult<Option<CrmRecord>> {
        self.check()?;
        Ok(self
            .records(object_type)
            .await
            .into_iter()
            .find(|r| r.id == id))
    }

    async fn create(
        &self,
        object_type: &str,
        properties: HashMap<String, String>,
    ) -> CrmResult<CrmRecord> {
        self.check()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst).to_string();
        let record = CrmRecord {
            id,
            properties: properties.into_iter().map(|(k, v)| (k, Some(v))).collect(),
        };
        self.insert(object_type, record.clone()).await;
        Ok(record)
    }

    async fn file_url(&self, file_id: &str) -> CrmResult<Option<String>> {
        self.check()?;
        Ok(self.files.read().await.get(file_id).cloned())
    }
}

/// Classifier that answers every upload with the same text
pub struct StubClassifier {
    pub response: String,
    pub calls: AtomicU64,
}

impl StubClassifier {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            calls: AtomicU64::new(0),
        }
    }

    pub fn completed_wire() -> Self {
        Self::new(
            r#"{"isWireTransfer": true, "statusText": "Completed", "amount": "$25,000.00", "bankName": "Chase", "referenceNumber": "FED-20240311-88"}"#,
        )
    }

    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentClassifier for StubClassifier {
    async fn classify(&self, _prompt: &str, _file: &UploadedFile) -> AppResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.max_upload_bytes = 1024 * 1024;
    config
}

/// Seed the store with one contact, an active deal with two comparables and
/// a sold deal
pub async fn seed_crm(crm: &InMemoryCrm) {
    let config = test_config();
    let objects = &config.crm;

    crm.insert(
        &objects.contact_object,
        CrmRecord::new("c-1")
            .with("email", INVESTOR_EMAIL)
            .with("firstname", "Dana")
            .with("lastname", "Whitfield"),
    )
    .await;

    crm.insert(
        &objects.deal_object,
        CrmRecord::new(ACTIVE_DEAL_ID)
            .with("address", "1234 Elm St")
            .with("city", "Dallas")
            .with("state", "TX")
            .with("zip", "75201")
            .with("deal_status", "active")
            .with("purchase_price", "$250,000")
            .with("rehab_estimate", "40000")
            .with("arv", "400000")
            .with("rent_estimate", "2800")
            .with("bedrooms", "3")
            .with("bathrooms", "2")
            .with("square_feet", "1650")
            .with("image_file_ids", "img-1; img-2"),
    )
    .await;

    crm.insert(
        &objects.deal_object,
        CrmRecord::new(SOLD_DEAL_ID)
            .with("address", "810 N Bishop Ave")
            .with("city", "Dallas")
            .with("state", "TX")
            .with("deal_status", "sold")
            .with("purchase_price", "180000")
            .with("arv", "260000"),
    )
    .await;

    crm.insert(
        &objects.comparable_object,
        CrmRecord::new("comp-1")
            .with("deal_id", ACTIVE_DEAL_ID)
            .with("address", "4021 Live Oak St, Dallas, TX 75204")
            .with("sale_price", "410000")
            .with("square_feet", "1700")
            .with("sale_date", "2024-02-14T00:00:00Z")
            .with("image_file_id", "img-comp-1"),
    )
    .await;

    crm.insert(
        &objects.comparable_object,
        CrmRecord::new("comp-2")
            .with("deal_id", ACTIVE_DEAL_ID)
            .with("address", "77 Unplaceable Ln, Mesquite, TX")
            .with("sale_price", "389000"),
    )
    .await;

    crm.insert_file("img-1", "https://files.example.com/img-1.jpg").await;
    crm.insert_file("img-2", "https://files.example.com/img-2.jpg").await;
    crm.insert_file("img-comp-1", "https://files.example.com/comp-1.jpg").await;
}

/// Everything a test needs to drive the services or the router
pub struct TestContext {
    pub crm: Arc<InMemoryCrm>,
    pub classifier: Arc<StubClassifier>,
    pub state: Arc<AppState>,
    pub audit_dir: tempfile::TempDir,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_classifier(StubClassifier::completed_wire()).await
    }

    pub async fn with_classifier(classifier: StubClassifier) -> Self {
        let crm = Arc::new(InMemoryCrm::new());
        seed_crm(&crm).await;

        let classifier = Arc::new(classifier);
        let audit_dir = tempfile::tempdir().expect("Failed to create audit dir");
        let audit = AuditTrailService::new(audit_dir.path().to_path_buf())
            .expect("Failed to create audit trail");

        let state = Arc::new(AppState::new(
            test_config(),
            crm.clone(),
            classifier.clone(),
            reqwest::Client::new(),
            Some(Arc::new(audit)),
        ));

        Self {
            crm,
            classifier,
            state,
            audit_dir,
        }
    }

    pub fn session_cookie(&self) -> String {
        let session = &self.state.config.session;
        let token =
            create_session_token(&session.secret, INVESTOR_EMAIL, chrono::Utc::now().timestamp())
                .expect("Failed to sign session");
        format!("{}={}", session.cookie_name, token)
    }

    pub async fn audit_log(&self) -> String {
        let audit = self.state.audit.as_ref().expect("audit enabled");
        tokio::fs::read_to_string(audit.log_file())
            .await
            .unwrap_or_default()
    }
}

pub fn personal_cash_buyer() -> BuyerInfo {
    BuyerInfo {
        buyer_type: Some(BuyerType::Personal),
        funding_type: Some(FundingType::Cash),
        first_name: "Dana".to_string(),
        last_name: "Whitfield".to_string(),
        email: INVESTOR_EMAIL.to_string(),
        phone: "214-555-0142".to_string(),
        mailing_address: "600 Main St, Dallas, TX 75202".to_string(),
        ..BuyerInfo::default()
    }
}

pub const WIRE_FILE_NAME: &str = "wire-confirmation.png";

pub fn wire_upload(verification_token: Option<String>) -> WireUpload {
    WireUpload {
        file_name: WIRE_FILE_NAME.to_string(),
        content_type: "image/png".to_string(),
        size_bytes: 48_213,
        verification_token,
    }
}

pub fn complete_submission() -> ReadyToBuyData {
    ReadyToBuyData {
        buyer_info: personal_cash_buyer(),
        signature: SIGNATURE.to_string(),
        wire_confirmation: Some(wire_upload(None)),
    }
}
