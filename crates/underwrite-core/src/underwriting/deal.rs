use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::UnderwriteError;
use crate::time_value;
use crate::types::{Money, Rate, MONTHS_PER_YEAR};
use crate::UnderwriteResult;

/// Largest monetary amount accepted on any input field.
pub const MAX_AMOUNT: Money = dec!(1000000000000000);

/// Longest amortization term accepted, in years.
pub const MAX_LOAN_TERM_YEARS: i32 = 100;

/// Smallest non-zero cash investment (down payment plus rehab) accepted.
/// Below one cent the cash-on-cash ratio leaves the decimal range.
pub const MIN_CASH_INVESTED: Money = dec!(0.01);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Raw parameters of a single-property rental deal.
///
/// Every key is required on the wire; the engine never fills in defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DealInput {
    /// Acquisition price of the property
    pub purchase_price: Money,
    /// Capital added at acquisition; always cash-funded
    pub rehab_cost: Money,
    /// Gross scheduled monthly rent
    pub monthly_rent: Money,
    pub annual_taxes: Money,
    pub annual_insurance: Money,
    /// Fixed monthly HOA dues, outside the rate-based rollup
    pub monthly_hoa: Money,
    /// Fraction of gross rent (0.05 = 5%)
    pub vacancy_rate: Rate,
    /// Fraction of gross rent
    pub maintenance_rate: Rate,
    /// Fraction of gross rent
    pub management_rate: Rate,
    /// Nominal annual interest rate, in [0, 1)
    pub interest_rate: Rate,
    /// Amortization term in whole years
    pub loan_term_years: i32,
    /// Fraction of the purchase price paid in cash
    pub down_payment_percent: Rate,
}

/// Monthly and annual figures for a deal. Values are unrounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DealMetrics {
    pub loan_amount: Money,
    pub monthly_principal_and_interest: Money,
    pub monthly_taxes: Money,
    pub monthly_insurance: Money,
    /// Vacancy + maintenance + management (as fractions of rent) plus HOA
    pub monthly_operating_expenses: Money,
    /// Rent less operating expenses; before debt service, taxes and insurance
    pub monthly_noi: Money,
    /// Principal, interest, taxes and insurance. HOA is not part of PITI.
    pub monthly_piti: Money,
    pub annual_cash_flow: Money,
    /// Annual cash flow over total cash invested, as a fraction
    pub cash_on_cash_roi: Rate,
}

impl DealMetrics {
    /// Display rounding: money to cents, the return ratio to four places.
    pub fn rounded(&self) -> DealMetrics {
        DealMetrics {
            loan_amount: self.loan_amount.round_dp(2),
            monthly_principal_and_interest: self.monthly_principal_and_interest.round_dp(2),
            monthly_taxes: self.monthly_taxes.round_dp(2),
            monthly_insurance: self.monthly_insurance.round_dp(2),
            monthly_operating_expenses: self.monthly_operating_expenses.round_dp(2),
            monthly_noi: self.monthly_noi.round_dp(2),
            monthly_piti: self.monthly_piti.round_dp(2),
            annual_cash_flow: self.annual_cash_flow.round_dp(2),
            cash_on_cash_roi: self.cash_on_cash_roi.round_dp(4),
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Underwrite a deal: loan sizing, amortized payment, expense rollup, NOI,
/// PITI, cash flow and cash-on-cash return.
///
/// Loan sizing policy: only the purchase price is financed. Rehab cost is
/// paid in cash, so it raises the cash-on-cash denominator but never the
/// loan amount.
pub fn underwrite(input: &DealInput) -> UnderwriteResult<DealMetrics> {
    validate_deal(input)?;

    let cash_invested = total_cash_invested(input);
    if cash_invested.is_zero() {
        return Err(UnderwriteError::DegenerateInvestment);
    }

    let months = Decimal::from(MONTHS_PER_YEAR);

    // --- Step 1-2: loan sizing and level payment ---
    let loan_amount = loan_amount(input);
    let monthly_principal_and_interest =
        time_value::pmt(monthly_rate(input), loan_periods(input), loan_amount)?;

    // --- Step 3: carrying costs ---
    let monthly_taxes = input.annual_taxes / months;
    let monthly_insurance = input.annual_insurance / months;

    // --- Step 4-5: operating expenses and NOI ---
    let variable_rate = input.vacancy_rate + input.maintenance_rate + input.management_rate;
    let monthly_operating_expenses = input.monthly_rent * variable_rate + input.monthly_hoa;
    let monthly_noi = input.monthly_rent - monthly_operating_expenses;

    // --- Step 6-7: PITI and cash flow ---
    let monthly_piti = monthly_principal_and_interest + monthly_taxes + monthly_insurance;
    let annual_cash_flow = months * (monthly_noi - monthly_piti);

    // --- Step 8: return on cash ---
    let cash_on_cash_roi =
        annual_cash_flow
            .checked_div(cash_invested)
            .ok_or_else(|| UnderwriteError::Overflow {
                context: "cash-on-cash return (annual cash flow / cash invested)".into(),
            })?;

    Ok(DealMetrics {
        loan_amount,
        monthly_principal_and_interest,
        monthly_taxes,
        monthly_insurance,
        monthly_operating_expenses,
        monthly_noi,
        monthly_piti,
        annual_cash_flow,
        cash_on_cash_roi,
    })
}

/// Check every field in declaration order and fail on the first bad one.
pub fn validate_deal(input: &DealInput) -> UnderwriteResult<()> {
    require_amount("purchase_price", input.purchase_price)?;
    require_amount("rehab_cost", input.rehab_cost)?;
    require_amount("monthly_rent", input.monthly_rent)?;
    require_amount("annual_taxes", input.annual_taxes)?;
    require_amount("annual_insurance", input.annual_insurance)?;
    require_amount("monthly_hoa", input.monthly_hoa)?;
    require_fraction("vacancy_rate", input.vacancy_rate)?;
    require_fraction("maintenance_rate", input.maintenance_rate)?;
    require_fraction("management_rate", input.management_rate)?;

    if input.interest_rate < Decimal::ZERO || input.interest_rate >= Decimal::ONE {
        return Err(UnderwriteError::InvalidInput {
            field: "interest_rate".into(),
            reason: "Interest rate must be between 0 and 1 (exclusive upper)".into(),
        });
    }

    if input.loan_term_years <= 0 || input.loan_term_years > MAX_LOAN_TERM_YEARS {
        return Err(UnderwriteError::InvalidInput {
            field: "loan_term_years".into(),
            reason: format!("Loan term must be between 1 and {MAX_LOAN_TERM_YEARS} years"),
        });
    }

    require_fraction("down_payment_percent", input.down_payment_percent)?;

    // Zero cash is the degenerate case, reported by `underwrite` itself.
    let cash_invested = total_cash_invested(input);
    if !cash_invested.is_zero() && cash_invested < MIN_CASH_INVESTED {
        let field = if input.rehab_cost.is_zero() {
            "down_payment_percent"
        } else {
            "rehab_cost"
        };
        return Err(UnderwriteError::InvalidInput {
            field: field.into(),
            reason: format!(
                "Cash invested (down payment + rehab cost) of {cash_invested} is below {MIN_CASH_INVESTED}"
            ),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

pub(crate) fn loan_amount(input: &DealInput) -> Money {
    input.purchase_price * (Decimal::ONE - input.down_payment_percent)
}

pub(crate) fn down_payment(input: &DealInput) -> Money {
    input.purchase_price * input.down_payment_percent
}

pub(crate) fn total_cash_invested(input: &DealInput) -> Money {
    down_payment(input) + input.rehab_cost
}

pub(crate) fn monthly_rate(input: &DealInput) -> Rate {
    input.interest_rate / Decimal::from(MONTHS_PER_YEAR)
}

/// Total monthly periods. Only meaningful once the term is validated positive.
pub(crate) fn loan_periods(input: &DealInput) -> u64 {
    u64::from(input.loan_term_years.unsigned_abs()) * u64::from(MONTHS_PER_YEAR)
}

fn require_amount(field: &str, value: Money) -> UnderwriteResult<()> {
    if value < Decimal::ZERO {
        return Err(UnderwriteError::InvalidInput {
            field: field.into(),
            reason: "Must not be negative".into(),
        });
    }
    if value > MAX_AMOUNT {
        return Err(UnderwriteError::InvalidInput {
            field: field.into(),
            reason: format!("Exceeds the supported maximum of {MAX_AMOUNT}"),
        });
    }
    Ok(())
}

fn require_fraction(field: &str, value: Rate) -> UnderwriteResult<()> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(UnderwriteError::InvalidInput {
            field: field.into(),
            reason: "Must be a fraction between 0 and 1".into(),
        });
    }
    Ok(())
}
