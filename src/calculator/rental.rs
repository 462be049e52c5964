use super::amortization::{monthly_payment, MAX_TERM_MONTHS};
use super::BUY_CLOSING_COST_RATE;
use serde::{Deserialize, Serialize};

/// DSCR lenders generally want rent to cover debt, tax and insurance 1.25x
pub const DSCR_WARNING_THRESHOLD: f64 = 1.25;

/// Inputs for a buy-and-hold rental financed with a DSCR loan.
///
/// `down_payment` is a fraction (0.25 = 25%). The `*_pct` fields and
/// `interest_rate` are percentages (8.0 = 8%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RentalInputs {
    pub purchase_price: f64,
    pub rehab_cost: f64,
    pub monthly_rent: f64,
    pub down_payment: f64,
    pub interest_rate: f64,
    pub loan_term_years: u32,
    pub management_pct: f64,
    pub maintenance_pct: f64,
    pub vacancy_pct: f64,
    pub monthly_taxes: f64,
    pub monthly_insurance: f64,
    pub monthly_hoa: f64,
}

impl Default for RentalInputs {
    fn default() -> Self {
        Self {
            purchase_price: 0.0,
            rehab_cost: 0.0,
            monthly_rent: 0.0,
            down_payment: 0.25,
            interest_rate: 7.5,
            loan_term_years: 30,
            management_pct: 8.0,
            maintenance_pct: 5.0,
            vacancy_pct: 5.0,
            monthly_taxes: 0.0,
            monthly_insurance: 0.0,
            monthly_hoa: 0.0,
        }
    }
}

impl RentalInputs {
    /// Loan term in months, `None` when it is zero or longer than
    /// [`MAX_TERM_MONTHS`]
    pub fn term_months(&self) -> Option<u32> {
        self.loan_term_years
            .checked_mul(12)
            .filter(|months| (1..=MAX_TERM_MONTHS).contains(months))
    }
}

/// Result of a rental analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalAnalysis {
    pub loan_amount: f64,
    pub down_payment: f64,
    pub closing_costs: f64,
    pub total_cash_invested: f64,
    pub total_basis: f64,
    pub loan_payment: f64,
    pub management: f64,
    pub maintenance: f64,
    pub vacancy: f64,
    pub operating_expenses: f64,
    pub monthly_expenses: f64,
    pub noi: f64,
    pub cash_flow: f64,
    pub annual_cash_flow: f64,
    pub cap_rate: f64,
    pub cash_on_cash: f64,
    pub dscr: f64,
    pub dscr_warning: Option<String>,
}

/// Lender warning for a DSCR below the usual minimum
pub fn dscr_warning(dscr: f64) -> Option<String> {
    if dscr < DSCR_WARNING_THRESHOLD {
        Some(format!(
            "DSCR of {:.2} is below the {:.2} minimum most DSCR lenders require. \
             Expect a larger down payment, a higher rate, or a declined loan.",
            dscr, DSCR_WARNING_THRESHOLD
        ))
    } else {
        None
    }
}

/// Run the rental numbers
pub fn analyze_rental(inputs: &RentalInputs) -> RentalAnalysis {
    let rent = inputs.monthly_rent;
    let total_basis = inputs.purchase_price + inputs.rehab_cost;

    let loan_amount = total_basis * (1.0 - inputs.down_payment);
    let down_payment = total_basis - loan_amount;
    let closing_costs = inputs.purchase_price * BUY_CLOSING_COST_RATE;
    let total_cash_invested = down_payment + closing_costs;

    let loan_payment = monthly_payment(
        loan_amount,
        inputs.interest_rate,
        inputs.loan_term_years.saturating_mul(12),
    );

    let management = rent * inputs.management_pct / 100.0;
    let maintenance = rent * inputs.maintenance_pct / 100.0;
    let vacancy = rent * inputs.vacancy_pct / 100.0;

    let operating_expenses = management
        + inputs.monthly_taxes
        + inputs.monthly_insurance
        + maintenance
        + vacancy
        + inputs.monthly_hoa;
    let monthly_expenses = operating_expenses + loan_payment;

    let noi = rent - operating_expenses;
    let cash_flow = rent - monthly_expenses;
    let annual_cash_flow = cash_flow * 12.0;

    let cap_rate = noi * 12.0 / total_basis * 100.0;
    let cash_on_cash = annual_cash_flow / total_cash_invested * 100.0;
    let dscr = rent / (loan_payment + inputs.monthly_taxes + inputs.monthly_insurance);

    RentalAnalysis {
        loan_amount,
        down_payment,
        closing_costs,
        total_cash_invested,
        total_basis,
        loan_payment,
        management,
        maintenance,
        vacancy,
        operating_expenses,
        monthly_expenses,
        noi,
        cash_flow,
        annual_cash_flow,
        cap_rate,
        cash_on_cash,
        dscr,
        dscr_warning: dscr_warning(dscr),
    }
}
