pub mod contact_repository;
pub mod deal_repository;
pub mod engagement_repository;

// Re-export all repositories for convenient access
pub use contact_repository::ContactRepository;
pub use deal_repository::DealRepository;
pub use engagement_repository::EngagementRepository;
