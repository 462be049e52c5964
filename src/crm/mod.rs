//! CRM object store access.
//!
//! The portal owns no database. Deals, comparables, contacts, engagement
//! events and offers all live as CRM objects reached through [`CrmStore`].

pub mod client;
pub mod store;

pub use client::HttpCrmClient;
pub use store::{CrmRecord, CrmStore, Filter, FilterOperator, SearchRequest};
