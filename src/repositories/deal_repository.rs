use crate::crm::{CrmRecord, CrmStore, Filter, SearchRequest};
use crate::error::{CrmError, CrmResult};
use crate::models::{Comparable, Coordinates, Deal, DealStatus};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::warn;

const DEAL_PROPERTIES: &[&str] = &[
    "address",
    "city",
    "state",
    "zip",
    "deal_status",
    "purchase_price",
    "rehab_estimate",
    "arv",
    "rent_estimate",
    "monthly_taxes",
    "bedrooms",
    "bathrooms",
    "square_feet",
    "description",
    "image_file_ids",
    "latitude",
    "longitude",
];

const COMPARABLE_PROPERTIES: &[&str] = &[
    "deal_id",
    "address",
    "sale_price",
    "square_feet",
    "bedrooms",
    "bathrooms",
    "sale_date",
    "image_file_id",
    "latitude",
    "longitude",
];

/// Repository for deals and their comparables.
///
/// List queries never fail: CRM errors are logged and come back as an empty
/// result. Records missing their core numbers are skipped.
pub struct DealRepository {
    store: Arc<dyn CrmStore>,
    deal_object: String,
    comparable_object: String,
}

impl DealRepository {
    /// Create a new DealRepository
    pub fn new(
        store: Arc<dyn CrmStore>,
        deal_object: impl Into<String>,
        comparable_object: impl Into<String>,
    ) -> Self {
        Self {
            store,
            deal_object: deal_object.into(),
            comparable_object: comparable_object.into(),
        }
    }

    /// All deals currently open to investors
    pub async fn find_active(&self) -> Vec<Deal> {
        let request = SearchRequest::new(DEAL_PROPERTIES)
            .filter(Filter::eq("deal_status", DealStatus::Active.as_str()));

        match self.store.search(&self.deal_object, &request).await {
            Ok(records) => records
                .iter()
                .filter_map(|record| match deal_from_record(record) {
                    Ok(deal) => Some(deal),
                    Err(e) => {
                        warn!("Skipping deal {}: {}", record.id, e);
                        None
                    }
                })
                .collect(),
            Err(e) => {
                warn!("Deal search failed, returning no deals: {}", e);
                Vec::new()
            }
        }
    }

    /// Find a deal by CRM id, without comparables
    pub async fn find_by_id(&self, id: &str) -> CrmResult<Option<Deal>> {
        match self.store.get(&self.deal_object, id, DEAL_PROPERTIES).await? {
            Some(record) => deal_from_record(&record).map(Some),
            None => Ok(None),
        }
    }

    /// Comparable sales attached to a deal
    pub async fn find_comparables(&self, deal_id: &str) -> Vec<Comparable> {
        let request =
            SearchRequest::new(COMPARABLE_PROPERTIES).filter(Filter::eq("deal_id", deal_id));

        match self.store.search(&self.comparable_object, &request).await {
            Ok(records) => records
                .iter()
                .filter_map(|record| match comparable_from_record(record) {
                    Ok(comp) => Some(comp),
                    Err(e) => {
                        warn!("Skipping comparable {}: {}", record.id, e);
                        None
                    }
                })
                .collect(),
            Err(e) => {
                warn!("Comparable search for deal {} failed: {}", deal_id, e);
                Vec::new()
            }
        }
    }

    /// Resolve a CRM file attachment to a download URL
    pub async fn file_url(&self, file_id: &str) -> Option<String> {
        match self.store.file_url(file_id).await {
            Ok(url) => url,
            Err(e) => {
                warn!("File lookup for {} failed: {}", file_id, e);
                None
            }
        }
    }
}

fn required_decimal(record: &CrmRecord, key: &str) -> CrmResult<Decimal> {
    record
        .get_decimal(key)
        .ok_or_else(|| CrmError::Decode(format!("missing or invalid {}", key)))
}

fn coordinates(record: &CrmRecord) -> Option<Coordinates> {
    match (record.get_f64("latitude"), record.get_f64("longitude")) {
        (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
        _ => None,
    }
}

/// Map a CRM deal record onto a [`Deal`]
pub fn deal_from_record(record: &CrmRecord) -> CrmResult<Deal> {
    let address = record
        .get_string("address")
        .ok_or_else(|| CrmError::Decode("missing address".to_string()))?;

    Ok(Deal {
        id: record.id.clone(),
        address,
        city: record.get_string("city"),
        state: record.get_string("state"),
        zip: record.get_string("zip"),
        status: deal_status(record),
        purchase_price: required_decimal(record, "purchase_price")?,
        rehab_estimate: record.get_decimal("rehab_estimate").unwrap_or(Decimal::ZERO),
        arv: required_decimal(record, "arv")?,
        rent_estimate: record.get_decimal("rent_estimate"),
        monthly_taxes: record.get_decimal("monthly_taxes"),
        bedrooms: record.get_u32("bedrooms"),
        bathrooms: record.get_f64("bathrooms").map(|b| b as f32),
        square_feet: record.get_u32("square_feet"),
        description: record.get_string("description"),
        image_file_ids: record.get_list("image_file_ids"),
        image_urls: Vec::new(),
        coordinates: coordinates(record),
        comparables: Vec::new(),
    })
}

fn deal_status(record: &CrmRecord) -> DealStatus {
    match record.get("deal_status").map(DealStatus::from_str) {
        Some(Ok(status)) => status,
        Some(Err(e)) => {
            warn!("Deal {}: {}, treating as inactive", record.id, e);
            DealStatus::Inactive
        }
        None => {
            warn!("Deal {} has no status, treating as inactive", record.id);
            DealStatus::Inactive
        }
    }
}

/// Map a CRM comparable record onto a [`Comparable`]
pub fn comparable_from_record(record: &CrmRecord) -> CrmResult<Comparable> {
    let address = record
        .get_string("address")
        .ok_or_else(|| CrmError::Decode("missing address".to_string()))?;

    Ok(Comparable {
        id: record.id.clone(),
        address,
        sale_price: required_decimal(record, "sale_price")?,
        square_feet: record.get_u32("square_feet"),
        bedrooms: record.get_u32("bedrooms"),
        bathrooms: record.get_f64("bathrooms").map(|b| b as f32),
        sale_date: record
            .get("sale_date")
            .and_then(|d| NaiveDate::parse_from_str(d.get(..10).unwrap_or(d), "%Y-%m-%d").ok()),
        image_file_id: record.get_string("image_file_id"),
        image_url: None,
        coordinates: coordinates(record),
    })
}
