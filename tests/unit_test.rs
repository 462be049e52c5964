mod helpers;

use approx::assert_relative_eq;
use dealroom_backend::auth::{create_session_token, verify_session_token};
use dealroom_backend::calculator::*;
use dealroom_backend::config::SessionConfig;
use dealroom_backend::models::*;
use dealroom_backend::repositories::deal_repository::{comparable_from_record, deal_from_record};
use dealroom_backend::crm::CrmRecord;
use dealroom_backend::services::wire_verification::parse_classification;
use dealroom_backend::wizard::{ReadyToBuyWizard, WizardError, WizardStep};
use helpers::*;

/// Unit tests for the flip calculator
#[test]
fn test_flip_reference_deal() {
    let analysis = analyze_flip(&FlipInputs::cash(250_000.0, 40_000.0, 400_000.0, 6.0));

    // 2% buy side, 5% sell side
    assert_relative_eq!(analysis.closing_costs_buy, 5_000.0, epsilon = 1e-6);
    assert_relative_eq!(analysis.selling_costs, 20_000.0, epsilon = 1e-6);
    assert_eq!(analysis.loan_amount, 0.0);
    assert_eq!(analysis.points_cost, 0.0);
    assert!(analysis.profit > 0.0);
    assert_relative_eq!(
        analysis.profit,
        400_000.0 - analysis.total_project_cost,
        epsilon = 1e-6
    );
}

#[test]
fn test_flip_profit_moves_with_inputs() {
    let base = FlipInputs::cash(250_000.0, 40_000.0, 400_000.0, 6.0);
    let profit = analyze_flip(&base).profit;

    let more_rehab = FlipInputs {
        rehab_cost: 60_000.0,
        ..base
    };
    let higher_arv = FlipInputs {
        assumed_arv: 420_000.0,
        ..base
    };
    let longer_hold = FlipInputs {
        hold_months: 9.0,
        ..base
    };

    assert!(analyze_flip(&more_rehab).profit < profit);
    assert!(analyze_flip(&higher_arv).profit > profit);
    assert!(analyze_flip(&longer_hold).profit < profit);
}

#[test]
fn test_hard_money_costs_more_than_cash() {
    let cash = FlipInputs::cash(250_000.0, 40_000.0, 400_000.0, 6.0);
    let financed = cash.with_financing(FlipFinancing::HardMoney {
        down_payment: 0.1,
        interest_rate: 12.0,
        points: 2.0,
    });

    let cash = analyze_flip(&cash);
    let financed = analyze_flip(&financed);

    assert_relative_eq!(financed.loan_amount, 225_000.0, epsilon = 1e-6);
    assert_relative_eq!(financed.points_cost, 4_500.0, epsilon = 1e-6);
    assert!(financed.profit < cash.profit);
    // Leverage shrinks the cash in the deal, so ROI climbs
    assert!(financed.total_cash_invested < cash.total_cash_invested);
    assert!(financed.roi > cash.roi);
}

#[test]
fn test_flip_nan_input_propagates() {
    let analysis = analyze_flip(&FlipInputs::cash(f64::NAN, 40_000.0, 400_000.0, 6.0));
    assert!(analysis.profit.is_nan());
}

/// Unit tests for the rental calculator
#[test]
fn test_rental_dscr_and_warning() {
    let strong = analyze_rental(&RentalInputs {
        purchase_price: 200_000.0,
        monthly_rent: 2_600.0,
        monthly_taxes: 300.0,
        monthly_insurance: 100.0,
        ..RentalInputs::default()
    });
    assert!(strong.dscr >= DSCR_WARNING_THRESHOLD);
    assert!(strong.dscr_warning.is_none());

    let weak = analyze_rental(&RentalInputs {
        purchase_price: 400_000.0,
        monthly_rent: 2_200.0,
        monthly_taxes: 650.0,
        monthly_insurance: 150.0,
        ..RentalInputs::default()
    });
    assert!(weak.dscr < DSCR_WARNING_THRESHOLD);
    assert!(weak.dscr_warning.is_some());
}

#[test]
fn test_rental_loan_uses_standard_payment() {
    let analysis = analyze_rental(&RentalInputs {
        purchase_price: 320_000.0,
        monthly_rent: 2_500.0,
        ..RentalInputs::default()
    });

    assert_relative_eq!(analysis.loan_amount, 240_000.0, epsilon = 1e-6);
    assert_relative_eq!(analysis.loan_payment, 1_678.11, epsilon = 0.01);
}

#[test]
fn test_rental_dscr_boundary_is_inclusive() {
    let inputs = RentalInputs {
        purchase_price: 480_000.0,
        monthly_rent: 1_562.5,
        interest_rate: 0.0,
        monthly_taxes: 150.0,
        monthly_insurance: 100.0,
        ..RentalInputs::default()
    };
    let analysis = analyze_rental(&inputs);
    assert_eq!(analysis.dscr, 1.25);
    assert_eq!(analysis.dscr_warning, None);
}

/// Unit tests for amortization
#[test]
fn test_amortization_pays_off_the_loan() {
    let schedule = amortization_schedule(100_000.0, 6.0, 360);
    assert_eq!(schedule.len(), 360);
    assert_relative_eq!(schedule.last().unwrap().balance, 0.0, epsilon = 1e-6);

    let principal: f64 = schedule.iter().map(|r| r.principal).sum();
    assert_relative_eq!(principal, 100_000.0, epsilon = 1e-6);

    let years = yearly_summaries(&schedule);
    assert_eq!(years.len(), 30);
    assert!(years[0].interest_paid > years[29].interest_paid);
}

#[test]
fn test_zero_rate_is_straight_line() {
    assert_relative_eq!(monthly_payment(12_000.0, 0.0, 12), 1_000.0, epsilon = 1e-9);
}

/// Unit tests for the Ready to Buy wizard
#[test]
fn test_wizard_happy_path() {
    let mut wizard = ReadyToBuyWizard::new();
    assert_eq!(wizard.step(), WizardStep::BuyerInfo);

    wizard.submit_buyer_info(personal_cash_buyer()).unwrap();
    assert_eq!(wizard.step(), WizardStep::ContractAndWire);

    wizard.set_signature(SIGNATURE).unwrap();
    wizard.attach_wire_upload(wire_upload(None)).unwrap();
    wizard.complete_contract().unwrap();
    assert!(wizard.is_celebrating());
    assert!(wizard.submission().is_none());

    wizard.finish_celebration().unwrap();
    assert_eq!(wizard.step(), WizardStep::Confirmation);
    assert_eq!(wizard.step().number(), 3);
    assert_eq!(wizard.submission(), Some(complete_submission()));
}

#[test]
fn test_wizard_blocks_incomplete_steps() {
    let mut wizard = ReadyToBuyWizard::new();

    let result = wizard.submit_buyer_info(BuyerInfo::default());
    assert!(matches!(result, Err(WizardError::IncompleteBuyerInfo(ref errors)) if !errors.is_empty()));
    assert_eq!(wizard.step(), WizardStep::BuyerInfo);

    wizard.submit_buyer_info(personal_cash_buyer()).unwrap();
    assert!(matches!(wizard.complete_contract(), Err(WizardError::MissingSignature)));

    wizard.set_signature(SIGNATURE).unwrap();
    assert!(matches!(wizard.complete_contract(), Err(WizardError::MissingWireUpload)));
    assert_eq!(wizard.step(), WizardStep::ContractAndWire);
}

#[test]
fn test_wizard_back_keeps_answers() {
    let mut wizard = ReadyToBuyWizard::new();
    wizard.submit_buyer_info(personal_cash_buyer()).unwrap();
    wizard.back().unwrap();

    assert_eq!(wizard.step(), WizardStep::BuyerInfo);
    assert_eq!(wizard.buyer_info(), &personal_cash_buyer());
}

#[test]
fn test_llc_hard_money_needs_extra_fields() {
    let buyer = BuyerInfo {
        buyer_type: Some(BuyerType::Llc),
        funding_type: Some(FundingType::HardMoney),
        ..personal_cash_buyer()
    };
    let errors = buyer.validation_errors();

    assert!(errors.iter().any(|e| e.contains("LLC name")));
    assert!(errors.iter().any(|e| e.contains("Lender name")));
    assert!(!errors.iter().any(|e| e.contains("Mailing address")));
}

#[test]
fn test_replay_rejects_missing_upload() {
    let data = ReadyToBuyData {
        wire_confirmation: None,
        ..complete_submission()
    };
    assert!(matches!(
        ReadyToBuyWizard::replay(&data),
        Err(WizardError::MissingWireUpload)
    ));
}

/// Unit tests for wire classification
#[test]
fn test_wire_status_from_classification() {
    let cases = [
        (r#"{"isWireTransfer": true, "statusText": "Sent"}"#, WireStatus::Verified),
        (r#"{"isWireTransfer": true, "statusText": "confirmed"}"#, WireStatus::Verified),
        (r#"{"isWireTransfer": true, "statusText": "Processing"}"#, WireStatus::Pending),
        (r#"{"isWireTransfer": true}"#, WireStatus::Pending),
        (r#"{"isWireTransfer": false, "statusText": "Completed"}"#, WireStatus::Invalid),
        ("not json at all", WireStatus::Invalid),
    ];

    for (raw, expected) in cases {
        assert_eq!(parse_classification(raw).status(), expected, "{}", raw);
    }
}

/// Unit tests for CRM record mapping
#[test]
fn test_deal_record_requires_core_numbers() {
    let record = CrmRecord::new("9").with("address", "5615 Belmont Ave");
    assert!(deal_from_record(&record).is_err());

    let record = record.with("purchase_price", "300000").with("arv", "$455,000");
    let deal = deal_from_record(&record).unwrap();
    // No pipeline stage means the deal is not open
    assert_eq!(deal.status, DealStatus::Inactive);
    assert_eq!(
        deal_from_record(&record.with("deal_status", "Available")).unwrap().status,
        DealStatus::Active
    );
    assert!(deal.comparables.is_empty());
}

#[test]
fn test_comparable_sale_date_accepts_timestamps() {
    let record = CrmRecord::new("c")
        .with("address", "2215 Ross Ave")
        .with("sale_price", "512000")
        .with("sale_date", "2023-11-02T15:04:05.000Z");
    let comp = comparable_from_record(&record).unwrap();
    assert_eq!(
        comp.sale_date,
        chrono::NaiveDate::from_ymd_opt(2023, 11, 2)
    );
}

/// Unit tests for sessions
#[test]
fn test_session_round_trip_and_expiry() {
    let config = SessionConfig::default();
    let token = create_session_token(&config.secret, INVESTOR_EMAIL, 1_700_000_000).unwrap();

    let session = verify_session_token(&config, &token, 1_700_000_100).unwrap();
    assert_eq!(session.email, INVESTOR_EMAIL);

    let later = 1_700_000_000 + config.max_age_secs + 1;
    assert!(verify_session_token(&config, &token, later).is_err());
}

/// Unit tests for geocoding fallbacks
#[test]
fn test_geocoding_never_fails() {
    use dealroom_backend::services::{GeocodingService, DALLAS_CENTER};

    let geocoder = GeocodingService::new(None, reqwest::Client::new());

    let known = tokio_test::block_on(geocoder.geocode("5615 Belmont Ave., Dallas TX 75206"));
    assert_eq!(known, Coordinates::new(32.8105, -96.7711));

    let unknown = tokio_test::block_on(geocoder.geocode(""));
    assert_eq!(unknown, DALLAS_CENTER);
}
