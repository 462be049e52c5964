use crate::calculator::{default_monthly_tax, FlipInputs, RentalInputs};
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Deal status as stored in the CRM pipeline.
///
/// Anything the pipeline reports that is not one of the known stages (draft,
/// withdrawn, blank) is `Inactive` and closed to offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealStatus {
    Active,
    UnderContract,
    Sold,
    Inactive,
}

impl DealStatus {
    /// Convert from CRM property value
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "active" | "available" => Ok(DealStatus::Active),
            "under_contract" | "pending" => Ok(DealStatus::UnderContract),
            "sold" | "closed" => Ok(DealStatus::Sold),
            _ => Err(format!("Invalid deal status: {}", s)),
        }
    }

    /// Convert to CRM property value
    pub fn as_str(&self) -> &'static str {
        match self {
            DealStatus::Active => "active",
            DealStatus::UnderContract => "under_contract",
            DealStatus::Sold => "sold",
            DealStatus::Inactive => "inactive",
        }
    }
}

impl From<String> for DealStatus {
    fn from(s: String) -> Self {
        Self::from_str(&s).unwrap_or(DealStatus::Inactive)
    }
}

/// Latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A comparable sale used to support the ARV
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparable {
    pub id: String,
    pub address: String,
    pub sale_price: Decimal,
    pub square_feet: Option<u32>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<f32>,
    pub sale_date: Option<NaiveDate>,
    /// CRM file attachment holding the listing photo
    #[serde(skip_serializing)]
    pub image_file_id: Option<String>,
    pub image_url: Option<String>,
    pub coordinates: Option<Coordinates>,
}

impl Comparable {
    /// Sale price per square foot, if the size is known
    pub fn price_per_sqft(&self) -> Option<Decimal> {
        match self.square_feet {
            Some(sqft) if sqft > 0 => Some((self.sale_price / Decimal::from(sqft)).round_dp(2)),
            _ => None,
        }
    }
}

/// A property deal offered to investors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    pub id: String,
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub status: DealStatus,
    pub purchase_price: Decimal,
    pub rehab_estimate: Decimal,
    pub arv: Decimal,
    pub rent_estimate: Option<Decimal>,
    pub monthly_taxes: Option<Decimal>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<f32>,
    pub square_feet: Option<u32>,
    pub description: Option<String>,
    #[serde(skip_serializing)]
    pub image_file_ids: Vec<String>,
    pub image_urls: Vec<String>,
    pub coordinates: Option<Coordinates>,
    pub comparables: Vec<Comparable>,
}

impl Deal {
    /// Street address with city, state and zip when present
    pub fn full_address(&self) -> String {
        let mut parts = vec![self.address.clone()];
        if let Some(city) = &self.city {
            parts.push(city.clone());
        }
        match (&self.state, &self.zip) {
            (Some(state), Some(zip)) => parts.push(format!("{} {}", state, zip)),
            (Some(state), None) => parts.push(state.clone()),
            (None, Some(zip)) => parts.push(zip.clone()),
            (None, None) => {}
        }
        parts.join(", ")
    }

    /// ARV minus purchase and rehab, before any costs
    pub fn gross_spread(&self) -> Decimal {
        self.arv - self.purchase_price - self.rehab_estimate
    }

    /// Check if deal is still open to offers
    pub fn is_active(&self) -> bool {
        self.status == DealStatus::Active
    }

    /// Cash flip inputs seeded from the deal's numbers
    pub fn flip_inputs(&self, hold_months: f64) -> FlipInputs {
        let purchase_price = self.purchase_price.to_f64().unwrap_or(0.0);
        let mut inputs = FlipInputs::cash(
            purchase_price,
            self.rehab_estimate.to_f64().unwrap_or(0.0),
            self.arv.to_f64().unwrap_or(0.0),
            hold_months,
        );
        inputs.monthly_property_tax = self
            .monthly_taxes
            .and_then(|t| t.to_f64())
            .unwrap_or_else(|| default_monthly_tax(purchase_price));
        inputs
    }

    /// Rental inputs seeded from the deal's numbers with default assumptions
    pub fn rental_inputs(&self) -> RentalInputs {
        let purchase_price = self.purchase_price.to_f64().unwrap_or(0.0);
        RentalInputs {
            purchase_price,
            rehab_cost: self.rehab_estimate.to_f64().unwrap_or(0.0),
            monthly_rent: self
                .rent_estimate
                .and_then(|r| r.to_f64())
                .unwrap_or(0.0),
            monthly_taxes: self
                .monthly_taxes
                .and_then(|t| t.to_f64())
                .unwrap_or_else(|| default_monthly_tax(purchase_price)),
            ..RentalInputs::default()
        }
    }
}
