//! Domain models for the Dealroom backend.
//!
//! Deals and contacts are read from the CRM; buyer, offer and wire types are
//! built from portal requests and written back as CRM records.

pub mod buyer;
pub mod contact;
pub mod deal;
pub mod engagement;
pub mod ready_to_buy;
pub mod wire;

// Re-export all models for convenient access
pub use buyer::{BuyerInfo, BuyerType, FundingType};
pub use contact::Contact;
pub use deal::{Comparable, Coordinates, Deal, DealStatus};
pub use engagement::{EngagementEvent, EngagementKind, NewOffer, Offer};
pub use ready_to_buy::{ReadyToBuyData, WireUpload};
pub use wire::{WireClassification, WireStatus, WireVerification};
