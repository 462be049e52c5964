use super::{
    ANNUAL_INSURANCE_RATE, ANNUAL_MISC_RATE, BUY_CLOSING_COST_RATE, DEFAULT_ANNUAL_TAX_RATE,
    SELLING_COST_RATE,
};
use serde::{Deserialize, Serialize};

/// How a flip is paid for
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FlipFinancing {
    Cash,
    HardMoney {
        /// Fraction of purchase price paid in cash (0.1 = 10%)
        down_payment: f64,
        /// Annual interest rate in percent
        interest_rate: f64,
        /// Origination points in percent of the loan
        points: f64,
    },
}

/// Inputs for a fix-and-flip analysis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlipInputs {
    pub purchase_price: f64,
    pub rehab_cost: f64,
    pub assumed_arv: f64,
    pub hold_months: f64,
    pub monthly_property_tax: f64,
    pub financing: FlipFinancing,
}

/// Result of a fix-and-flip analysis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlipAnalysis {
    pub closing_costs_buy: f64,
    pub selling_costs: f64,
    pub monthly_insurance: f64,
    pub monthly_misc: f64,
    pub monthly_interest: f64,
    pub monthly_holding_cost: f64,
    pub total_holding_cost: f64,
    pub loan_amount: f64,
    pub down_payment: f64,
    pub points_cost: f64,
    pub total_project_cost: f64,
    pub total_cash_invested: f64,
    pub profit: f64,
    pub roi: f64,
    pub annualized_roi: f64,
}

/// Property tax estimate for deals that carry no tax figure
pub fn default_monthly_tax(purchase_price: f64) -> f64 {
    purchase_price * DEFAULT_ANNUAL_TAX_RATE / 12.0
}

impl FlipInputs {
    /// Cash purchase with the default tax estimate
    pub fn cash(purchase_price: f64, rehab_cost: f64, assumed_arv: f64, hold_months: f64) -> Self {
        Self {
            purchase_price,
            rehab_cost,
            assumed_arv,
            hold_months,
            monthly_property_tax: default_monthly_tax(purchase_price),
            financing: FlipFinancing::Cash,
        }
    }

    pub fn with_financing(mut self, financing: FlipFinancing) -> Self {
        self.financing = financing;
        self
    }
}

/// Run the flip numbers
pub fn analyze_flip(inputs: &FlipInputs) -> FlipAnalysis {
    let purchase_price = inputs.purchase_price;
    let arv = inputs.assumed_arv;
    let months = inputs.hold_months;

    let closing_costs_buy = purchase_price * BUY_CLOSING_COST_RATE;
    let selling_costs = arv * SELLING_COST_RATE;
    let monthly_insurance = arv * ANNUAL_INSURANCE_RATE / 12.0;
    let monthly_misc = arv * ANNUAL_MISC_RATE / 12.0;
    let base_holding = inputs.monthly_property_tax + monthly_insurance + monthly_misc;

    let (loan_amount, down_payment, monthly_interest, points_cost) = match inputs.financing {
        FlipFinancing::Cash => (0.0, purchase_price, 0.0, 0.0),
        FlipFinancing::HardMoney {
            down_payment,
            interest_rate,
            points,
        } => {
            let loan = purchase_price * (1.0 - down_payment);
            (
                loan,
                purchase_price - loan,
                loan * interest_rate / 100.0 / 12.0,
                loan * points / 100.0,
            )
        }
    };

    let monthly_holding_cost = base_holding + monthly_interest;
    let total_holding_cost = monthly_holding_cost * months;

    // Cash out of pocket before the sale closes
    let total_cash_invested =
        down_payment + closing_costs_buy + points_cost + inputs.rehab_cost + total_holding_cost;

    // The loan principal is repaid from sale proceeds
    let total_project_cost = total_cash_invested + selling_costs + loan_amount;

    let profit = arv - total_project_cost;
    let roi = profit / total_cash_invested * 100.0;
    let annualized_roi = roi / months * 12.0;

    FlipAnalysis {
        closing_costs_buy,
        selling_costs,
        monthly_insurance,
        monthly_misc,
        monthly_interest,
        monthly_holding_cost,
        total_holding_cost,
        loan_amount,
        down_payment,
        points_cost,
        total_project_cost,
        total_cash_invested,
        profit,
        roi,
        annualized_roi,
    }
}
