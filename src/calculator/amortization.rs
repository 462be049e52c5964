use serde::{Deserialize, Serialize};

/// Longest loan the calculators will schedule (50 years)
pub const MAX_TERM_MONTHS: u32 = 600;

/// Standard amortizing monthly payment.
///
/// `P * r * (1+r)^n / ((1+r)^n - 1)` with `r = annual_rate_pct / 100 / 12` and
/// `n = term_months`. A zero rate pays the principal down linearly.
pub fn monthly_payment(principal: f64, annual_rate_pct: f64, term_months: u32) -> f64 {
    let n = term_months as f64;
    let r = annual_rate_pct / 100.0 / 12.0;

    if r == 0.0 {
        return principal / n;
    }

    let growth = (1.0 + r).powf(n);
    principal * r * growth / (growth - 1.0)
}

/// One month of an amortization schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub month: u32,
    pub payment: f64,
    pub principal: f64,
    pub interest: f64,
    pub balance: f64,
}

/// Totals for one loan year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearSummary {
    pub year: u32,
    pub principal_paid: f64,
    pub interest_paid: f64,
    pub ending_balance: f64,
}

/// Month-by-month schedule for a fully amortizing loan.
///
/// Callers bound `term_months` by [`MAX_TERM_MONTHS`]; the schedule holds one
/// row per month.
pub fn amortization_schedule(
    principal: f64,
    annual_rate_pct: f64,
    term_months: u32,
) -> Vec<AmortizationRow> {
    let payment = monthly_payment(principal, annual_rate_pct, term_months);
    let r = annual_rate_pct / 100.0 / 12.0;

    let mut balance = principal;
    let mut rows = Vec::with_capacity(term_months.min(MAX_TERM_MONTHS) as usize);

    for month in 1..=term_months {
        let interest = balance * r;
        let mut principal_part = payment - interest;
        // Last payment absorbs floating point drift
        if month == term_months {
            principal_part = balance;
        }
        balance -= principal_part;

        rows.push(AmortizationRow {
            month,
            payment: principal_part + interest,
            principal: principal_part,
            interest,
            balance: balance.max(0.0),
        });
    }

    rows
}

/// Fold a monthly schedule into yearly totals
pub fn yearly_summaries(rows: &[AmortizationRow]) -> Vec<YearSummary> {
    rows.chunks(12)
        .enumerate()
        .map(|(i, year)| YearSummary {
            year: i as u32 + 1,
            principal_paid: year.iter().map(|r| r.principal).sum(),
            interest_paid: year.iter().map(|r| r.interest).sum(),
            ending_balance: year.last().map(|r| r.balance).unwrap_or(0.0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_thirty_year_payment() {
        // 240k at 7.5% over 30 years
        let payment = monthly_payment(240_000.0, 7.5, 360);
        assert_relative_eq!(payment, 1678.11, epsilon = 0.01);
    }

    #[test]
    fn test_zero_rate_is_linear() {
        assert_relative_eq!(monthly_payment(120_000.0, 0.0, 120), 1000.0);
    }

    #[test]
    fn test_schedule_pays_off_loan() {
        let rows = amortization_schedule(100_000.0, 6.0, 360);
        assert_eq!(rows.len(), 360);
        assert_relative_eq!(rows.last().unwrap().balance, 0.0, epsilon = 1e-6);

        let principal: f64 = rows.iter().map(|r| r.principal).sum();
        assert_relative_eq!(principal, 100_000.0, epsilon = 1e-6);

        // Interest share shrinks as the balance falls
        assert!(rows[0].interest > rows[359].interest);
    }

    #[test]
    fn test_yearly_summaries() {
        let rows = amortization_schedule(100_000.0, 6.0, 360);
        let years = yearly_summaries(&rows);
        assert_eq!(years.len(), 30);
        assert_eq!(years[0].year, 1);
        assert_relative_eq!(years[0].ending_balance, rows[11].balance);
        assert!(years[0].interest_paid > years[29].interest_paid);
    }
}
