use crate::auth::{
    clear_session_cookie, create_session_token, session_cookie, sign_wire_status, Session,
};
use crate::calculator::{
    amortization_schedule, analyze_flip, analyze_rental, default_monthly_tax, monthly_payment,
    yearly_summaries, AmortizationRow, FlipAnalysis, FlipFinancing, FlipInputs, RentalAnalysis,
    RentalInputs, YearSummary, MAX_TERM_MONTHS,
};
use crate::error::{ApiError, AppError};
use crate::models::{
    Deal, EngagementEvent, EngagementKind, NewOffer, Offer, ReadyToBuyData, WireVerification,
};
use crate::services::{DealAnalysis, ReadyToBuyReceipt, UploadedFile};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

type ApiResult<T> = Result<T, ApiError>;

const DEFAULT_HOLD_MONTHS: f64 = 6.0;

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub email: String,
    pub name: Option<String>,
}

/// Sign in a contact that already exists in the CRM
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let contact = state
        .contact_repo
        .find_by_email(&request.email)
        .await
        .map_err(|e| AppError::from(e).into_api_error("Login failed"))?
        .ok_or_else(|| {
            info!("Login refused for unknown contact");
            ApiError::new(StatusCode::UNAUTHORIZED, "No investor account for that email")
        })?;

    let session_config = &state.config.session;
    let token = create_session_token(
        &session_config.secret,
        &contact.email,
        chrono::Utc::now().timestamp(),
    )
    .map_err(|e| e.into_api_error("Login failed"))?;
    let cookie = session_cookie(session_config, &token, state.config.is_production());

    info!("Contact {} signed in", contact.id);
    Ok((
        [(SET_COOKIE, cookie)],
        Json(SessionResponse {
            name: Some(contact.display_name()),
            email: contact.email,
        }),
    ))
}

pub async fn logout(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(SET_COOKIE, clear_session_cookie(&state.config.session))],
        StatusCode::NO_CONTENT,
    )
}

pub async fn current_session(Extension(session): Extension<Session>) -> Json<SessionResponse> {
    Json(SessionResponse {
        email: session.email,
        name: None,
    })
}

pub async fn list_deals(State(state): State<Arc<AppState>>) -> Json<Vec<Deal>> {
    Json(state.deal_service.list_deals().await)
}

pub async fn get_deal(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
) -> ApiResult<Json<Deal>> {
    let deal = state
        .deal_service
        .get_deal(&id)
        .await
        .map_err(|e| e.into_api_error("Failed to load deal"))?;

    if let Err(e) = state
        .engagement_service
        .track(&deal.id, &session.email, EngagementKind::DealViewed, serde_json::Value::Null)
        .await
    {
        warn!("Failed to track view of deal {}: {}", deal.id, e);
    }

    Ok(Json(deal))
}

#[derive(Debug, Deserialize)]
pub struct AnalysisQuery {
    pub hold_months: Option<f64>,
}

pub async fn deal_analysis(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<AnalysisQuery>,
) -> ApiResult<Json<DealAnalysis>> {
    let hold_months = query.hold_months.unwrap_or(DEFAULT_HOLD_MONTHS);
    if hold_months.is_nan() || hold_months <= 0.0 {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "hold_months must be positive",
        ));
    }

    state
        .deal_service
        .analyze(&id, hold_months)
        .await
        .map(Json)
        .map_err(|e| e.into_api_error("Failed to analyze deal"))
}

/// Flip calculator body. Tax and financing fall back to the deal defaults.
#[derive(Debug, Deserialize)]
pub struct FlipRequest {
    pub purchase_price: f64,
    pub rehab_cost: f64,
    pub assumed_arv: f64,
    pub hold_months: f64,
    pub monthly_property_tax: Option<f64>,
    #[serde(default)]
    pub financing: Option<FlipFinancing>,
    pub deal_id: Option<String>,
}

impl FlipRequest {
    fn inputs(&self) -> FlipInputs {
        FlipInputs {
            purchase_price: self.purchase_price,
            rehab_cost: self.rehab_cost,
            assumed_arv: self.assumed_arv,
            hold_months: self.hold_months,
            monthly_property_tax: self
                .monthly_property_tax
                .unwrap_or_else(|| default_monthly_tax(self.purchase_price)),
            financing: self.financing.unwrap_or(FlipFinancing::Cash),
        }
    }
}

pub async fn flip_calculator(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Json(request): Json<FlipRequest>,
) -> Json<FlipAnalysis> {
    let inputs = request.inputs();
    let analysis = analyze_flip(&inputs);

    if let Some(deal_id) = &request.deal_id {
        track_calculator(&state, deal_id, &session.email, "flip", &inputs).await;
    }
    Json(analysis)
}

#[derive(Debug, Deserialize)]
pub struct RentalRequest {
    #[serde(flatten)]
    pub inputs: RentalInputs,
    pub deal_id: Option<String>,
}

pub async fn rental_calculator(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Json(request): Json<RentalRequest>,
) -> ApiResult<Json<RentalAnalysis>> {
    if request.inputs.term_months().is_none() {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            format!(
                "loan_term_years must be between 1 and {}",
                MAX_TERM_MONTHS / 12
            ),
        ));
    }

    let analysis = analyze_rental(&request.inputs);

    if let Some(deal_id) = &request.deal_id {
        track_calculator(&state, deal_id, &session.email, "rental", &request.inputs).await;
    }
    Ok(Json(analysis))
}

async fn track_calculator<T: Serialize>(
    state: &AppState,
    deal_id: &str,
    email: &str,
    calculator: &str,
    inputs: &T,
) {
    let metadata = serde_json::json!({ "calculator": calculator, "inputs": inputs });
    if let Err(e) = state
        .engagement_service
        .track(deal_id, email, EngagementKind::CalculatorUsed, metadata)
        .await
    {
        warn!("Failed to track {} calculator on deal {}: {}", calculator, deal_id, e);
    }
}

#[derive(Debug, Deserialize)]
pub struct AmortizationRequest {
    pub principal: f64,
    pub annual_rate: f64,
    pub term_months: u32,
}

#[derive(Debug, Serialize)]
pub struct AmortizationResponse {
    pub monthly_payment: f64,
    pub schedule: Vec<AmortizationRow>,
    pub years: Vec<YearSummary>,
}

pub async fn amortization_calculator(
    Json(request): Json<AmortizationRequest>,
) -> ApiResult<Json<AmortizationResponse>> {
    if request.term_months == 0 || request.term_months > MAX_TERM_MONTHS {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            format!("term_months must be between 1 and {}", MAX_TERM_MONTHS),
        ));
    }

    let schedule =
        amortization_schedule(request.principal, request.annual_rate, request.term_months);
    let years = yearly_summaries(&schedule);

    Ok(Json(AmortizationResponse {
        monthly_payment: monthly_payment(
            request.principal,
            request.annual_rate,
            request.term_months,
        ),
        schedule,
        years,
    }))
}

#[derive(Debug, Deserialize)]
pub struct EngagementRequest {
    pub kind: EngagementKind,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

pub async fn track_engagement(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(deal_id): Path<String>,
    Json(request): Json<EngagementRequest>,
) -> ApiResult<(StatusCode, Json<EngagementEvent>)> {
    state
        .engagement_service
        .track(&deal_id, &session.email, request.kind, request.metadata)
        .await
        .map(|event| (StatusCode::CREATED, Json(event)))
        .map_err(|e| e.into_api_error("Failed to record activity"))
}

pub async fn create_offer(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(deal_id): Path<String>,
    Json(offer): Json<NewOffer>,
) -> ApiResult<(StatusCode, Json<Offer>)> {
    state
        .engagement_service
        .create_offer(&deal_id, &session.email, offer)
        .await
        .map(|offer| (StatusCode::CREATED, Json(offer)))
        .map_err(|e| e.into_api_error("Failed to submit offer"))
}

pub async fn list_offers(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(deal_id): Path<String>,
) -> Json<Vec<Offer>> {
    Json(
        state
            .engagement_service
            .offers_for(&deal_id, &session.email)
            .await,
    )
}

/// Verification result plus the signed token a Ready to Buy submission carries
#[derive(Debug, Serialize)]
pub struct WireVerifyResponse {
    #[serde(flatten)]
    pub verification: WireVerification,
    pub verification_token: String,
}

/// Wire screenshot upload. `data_base64` may be bare base64 or a data URL.
#[derive(Debug, Deserialize)]
pub struct WireUploadRequest {
    pub file_name: String,
    pub content_type: String,
    pub data_base64: String,
    pub deal_id: Option<String>,
}

pub async fn verify_wire(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Json(request): Json<WireUploadRequest>,
) -> ApiResult<Json<WireVerifyResponse>> {
    let encoded = match request.data_base64.split_once("base64,") {
        Some((_, payload)) => payload,
        None => request.data_base64.as_str(),
    };
    let data = STANDARD
        .decode(encoded.trim())
        .map_err(|_| ApiError::new(StatusCode::BAD_REQUEST, "Invalid file encoding"))?;

    let file = UploadedFile {
        file_name: request.file_name,
        content_type: request.content_type,
        data,
    };

    let verification = state
        .wire_service
        .verify(&file)
        .await
        .map_err(|e| e.into_api_error("Failed to verify wire confirmation"))?;

    if let Some(audit) = &state.audit {
        if let Err(e) = audit
            .log_wire_verification(&session.email, &file.file_name, &verification)
            .await
        {
            warn!("Failed to audit wire upload {}: {}", file.file_name, e);
        }
    }

    if let Some(deal_id) = &request.deal_id {
        let metadata = serde_json::json!({
            "file_name": file.file_name,
            "status": verification.status.as_str(),
        });
        if let Err(e) = state
            .engagement_service
            .track(deal_id, &session.email, EngagementKind::WireUploaded, metadata)
            .await
        {
            warn!("Failed to track wire upload on deal {}: {}", deal_id, e);
        }
    }

    let verification_token = sign_wire_status(
        &state.config.session.secret,
        &session.email,
        &file.file_name,
        verification.status,
    )
    .map_err(|e| e.into_api_error("Failed to verify wire confirmation"))?;

    Ok(Json(WireVerifyResponse {
        verification,
        verification_token,
    }))
}

pub async fn submit_ready_to_buy(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(deal_id): Path<String>,
    Json(data): Json<ReadyToBuyData>,
) -> ApiResult<(StatusCode, Json<ReadyToBuyReceipt>)> {
    state
        .ready_to_buy_service
        .submit(&deal_id, &session.email, data)
        .await
        .map(|receipt| (StatusCode::CREATED, Json(receipt)))
        .map_err(|e| e.into_api_error("Failed to submit purchase request"))
}
