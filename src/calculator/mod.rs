//! Real-estate deal calculators.
//!
//! Everything here is plain `f64` arithmetic with no I/O. Callers convert CRM
//! money values (`Decimal`) at the boundary. Bad numeric input is not
//! rejected: NaN and infinities flow through the formulas unchanged.

pub mod amortization;
pub mod flip;
pub mod rental;

pub use amortization::{
    amortization_schedule, monthly_payment, yearly_summaries, AmortizationRow, YearSummary,
    MAX_TERM_MONTHS,
};
pub use flip::{analyze_flip, default_monthly_tax, FlipAnalysis, FlipFinancing, FlipInputs};
pub use rental::{analyze_rental, RentalAnalysis, RentalInputs, DSCR_WARNING_THRESHOLD};

/// Buy-side closing costs as a fraction of purchase price
pub const BUY_CLOSING_COST_RATE: f64 = 0.02;
/// Sell-side costs (commissions, title) as a fraction of sale price
pub const SELLING_COST_RATE: f64 = 0.05;
/// Annual insurance as a fraction of ARV
pub const ANNUAL_INSURANCE_RATE: f64 = 0.015;
/// Annual miscellaneous holding costs (utilities, upkeep) as a fraction of ARV
pub const ANNUAL_MISC_RATE: f64 = 0.01;
/// Annual property tax rate used when a deal carries no tax figure
pub const DEFAULT_ANNUAL_TAX_RATE: f64 = 0.02;
