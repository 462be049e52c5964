//! Dealroom Backend Library
//!
//! This module exposes the backend components for use by tests and other consumers.

pub mod auth;
pub mod calculator;
pub mod config;
pub mod crm;
pub mod error;
pub mod http;
pub mod models;
pub mod repositories;
pub mod services;
pub mod wizard;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, AppResult};

use crm::CrmStore;
use repositories::*;
use services::*;
use std::sync::Arc;

/// Application state containing all repositories and services
pub struct AppState {
    pub config: AppConfig,
    pub contact_repo: Arc<ContactRepository>,
    pub deal_service: Arc<DealService>,
    pub engagement_service: Arc<EngagementService>,
    pub ready_to_buy_service: Arc<ReadyToBuyService>,
    pub wire_service: Arc<WireVerificationService>,
    pub audit: Option<Arc<AuditTrailService>>,
}

impl AppState {
    /// Wire repositories and services over a CRM store and a document classifier
    pub fn new(
        config: AppConfig,
        store: Arc<dyn CrmStore>,
        classifier: Arc<dyn DocumentClassifier>,
        http: reqwest::Client,
        audit: Option<Arc<AuditTrailService>>,
    ) -> Self {
        let crm = &config.crm;
        let contact_repo = Arc::new(ContactRepository::new(store.clone(), &crm.contact_object));
        let deal_repo = Arc::new(DealRepository::new(
            store.clone(),
            &crm.deal_object,
            &crm.comparable_object,
        ));
        let engagement_repo = Arc::new(EngagementRepository::new(
            store,
            &crm.engagement_object,
            &crm.offer_object,
        ));

        let geocoder = Arc::new(GeocodingService::new(config.geocoding_api_key.clone(), http));

        Self {
            contact_repo,
            deal_service: Arc::new(DealService::new(deal_repo.clone(), geocoder)),
            engagement_service: Arc::new(EngagementService::new(
                deal_repo.clone(),
                engagement_repo.clone(),
                audit.clone(),
            )),
            ready_to_buy_service: Arc::new(ReadyToBuyService::new(
                deal_repo,
                engagement_repo,
                audit.clone(),
                config.session.secret.clone(),
            )),
            wire_service: Arc::new(WireVerificationService::new(
                classifier,
                config.max_upload_bytes,
            )),
            audit,
            config,
        }
    }
}
