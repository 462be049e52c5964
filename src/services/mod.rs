pub mod audit;
pub mod deal_service;
pub mod engagement_service;
pub mod geocoding;
pub mod ready_to_buy_service;
pub mod wire_verification;

pub use audit::AuditTrailService;
pub use deal_service::{DealAnalysis, DealService};
pub use engagement_service::EngagementService;
pub use geocoding::{GeocodingService, DALLAS_CENTER};
pub use ready_to_buy_service::{ReadyToBuyReceipt, ReadyToBuyService};
pub use wire_verification::{
    ChatCompletionsClassifier, DocumentClassifier, UploadedFile, WireVerificationService,
};
