use crate::calculator::{analyze_flip, analyze_rental, FlipAnalysis, RentalAnalysis};
use crate::error::{AppError, AppResult};
use crate::models::{Comparable, Deal};
use crate::repositories::DealRepository;
use crate::services::GeocodingService;
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Default flip and rental numbers for a deal
#[derive(Debug, Clone, Serialize)]
pub struct DealAnalysis {
    pub deal_id: String,
    pub hold_months: f64,
    pub flip: FlipAnalysis,
    pub rental: Option<RentalAnalysis>,
}

/// Service for loading deals for the portal
pub struct DealService {
    deal_repo: Arc<DealRepository>,
    geocoder: Arc<GeocodingService>,
}

impl DealService {
    pub fn new(deal_repo: Arc<DealRepository>, geocoder: Arc<GeocodingService>) -> Self {
        Self {
            deal_repo,
            geocoder,
        }
    }

    /// Active deals with their cover photo resolved
    pub async fn list_deals(&self) -> Vec<Deal> {
        let deals = self.deal_repo.find_active().await;

        join_all(deals.into_iter().map(|mut deal| async move {
            if let Some(file_id) = deal.image_file_ids.first() {
                if let Some(url) = self.deal_repo.file_url(file_id).await {
                    deal.image_urls.push(url);
                }
            }
            deal
        }))
        .await
    }

    /// One deal with photos, coordinates and comparables resolved
    pub async fn get_deal(&self, id: &str) -> AppResult<Deal> {
        let mut deal = self
            .deal_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Deal {} not found", id)))?;

        let address = deal.full_address();
        let (image_urls, coordinates, comparables) = futures::join!(
            self.resolve_images(&deal.image_file_ids),
            async {
                match deal.coordinates {
                    Some(coords) => coords,
                    None => self.geocoder.geocode(&address).await,
                }
            },
            self.load_comparables(&deal.id),
        );

        deal.image_urls = image_urls;
        deal.coordinates = Some(coordinates);
        deal.comparables = comparables;

        info!(
            "Loaded deal {} with {} comparables",
            deal.id,
            deal.comparables.len()
        );
        Ok(deal)
    }

    /// Flip numbers from the deal's own figures, plus rental numbers when the
    /// deal carries a rent estimate
    pub async fn analyze(&self, id: &str, hold_months: f64) -> AppResult<DealAnalysis> {
        let deal = self
            .deal_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Deal {} not found", id)))?;

        Ok(DealAnalysis {
            deal_id: deal.id.clone(),
            hold_months,
            flip: analyze_flip(&deal.flip_inputs(hold_months)),
            rental: deal
                .rent_estimate
                .map(|_| analyze_rental(&deal.rental_inputs())),
        })
    }

    async fn resolve_images(&self, file_ids: &[String]) -> Vec<String> {
        join_all(file_ids.iter().map(|id| self.deal_repo.file_url(id)))
            .await
            .into_iter()
            .flatten()
            .collect()
    }

    /// Comparables in CRM order, each with its photo and coordinates looked
    /// up concurrently
    async fn load_comparables(&self, deal_id: &str) -> Vec<Comparable> {
        let comparables = self.deal_repo.find_comparables(deal_id).await;

        join_all(comparables.into_iter().map(|mut comp| async move {
            let image = async {
                match comp.image_file_id.as_deref() {
                    Some(file_id) => self.deal_repo.file_url(file_id).await,
                    None => None,
                }
            };
            let coordinates = async {
                match comp.coordinates {
                    Some(coords) => coords,
                    None => self.geocoder.geocode(&comp.address).await,
                }
            };
            let (image_url, coordinates) = futures::join!(image, coordinates);
            comp.image_url = image_url;
            comp.coordinates = Some(coordinates);
            comp
        }))
        .await
    }
}
