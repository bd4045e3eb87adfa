use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::deal::{down_payment, total_cash_invested, underwrite, DealInput, DealMetrics};
use crate::types::{with_metadata, ComputationOutput, Money, Rate, MONTHS_PER_YEAR};
use crate::UnderwriteResult;

const METHODOLOGY: &str = "Rental Deal Underwriting (Fixed-Rate Amortizing Loan)";

/// Underwriting metrics plus the ratios a lender or investor reads next to them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealAnalysis {
    pub metrics: DealMetrics,
    pub down_payment: Money,
    /// Down payment plus rehab cost
    pub total_cash_invested: Money,
    pub monthly_cash_flow: Money,
    pub annual_noi: Money,
    /// 12 * monthly principal and interest
    pub annual_debt_service: Money,
    /// Loan amount / purchase price
    pub loan_to_value: Rate,
    /// Annual NOI / annual debt service; absent for an unlevered deal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debt_service_coverage_ratio: Option<Decimal>,
    /// Annual NOI / purchase price; absent when the price is zero
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cap_rate: Option<Rate>,
    /// (Operating expenses + PITI) / gross rent; absent when rent is zero
    #[serde(skip_serializing_if = "Option::is_none")]
    pub break_even_ratio: Option<Decimal>,
}

impl DealAnalysis {
    /// Display rounding: money to cents; ratios are left as computed.
    pub fn rounded(&self) -> DealAnalysis {
        DealAnalysis {
            metrics: self.metrics.rounded(),
            down_payment: self.down_payment.round_dp(2),
            total_cash_invested: self.total_cash_invested.round_dp(2),
            monthly_cash_flow: self.monthly_cash_flow.round_dp(2),
            annual_noi: self.annual_noi.round_dp(2),
            annual_debt_service: self.annual_debt_service.round_dp(2),
            ..self.clone()
        }
    }
}

/// Underwrite a deal and wrap the result with derived ratios, warnings and
/// computation metadata.
pub fn analyze_deal(input: &DealInput) -> UnderwriteResult<ComputationOutput<DealAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let metrics = underwrite(input)?;
    let months = Decimal::from(MONTHS_PER_YEAR);

    let monthly_cash_flow = metrics.monthly_noi - metrics.monthly_piti;
    let annual_noi = metrics.monthly_noi * months;
    let annual_debt_service = metrics.monthly_principal_and_interest * months;
    let loan_to_value = Decimal::ONE - input.down_payment_percent;

    let debt_service_coverage_ratio = ratio(annual_noi, annual_debt_service);
    let cap_rate = ratio(annual_noi, input.purchase_price);
    let break_even_ratio = ratio(
        metrics.monthly_operating_expenses + metrics.monthly_piti,
        input.monthly_rent,
    );

    // --- Warnings ---
    if let Some(dscr) = debt_service_coverage_ratio {
        if dscr < dec!(1.2) {
            warnings.push(format!(
                "DSCR of {:.2} is below 1.20x: lender covenant risk",
                dscr
            ));
        }
    }

    if loan_to_value > dec!(0.80) {
        warnings.push(format!(
            "LTV of {:.1}% exceeds 80%: high leverage",
            loan_to_value * dec!(100)
        ));
    }

    if metrics.annual_cash_flow < Decimal::ZERO {
        warnings.push(format!(
            "Negative annual cash flow of {:.2}: the deal does not carry itself",
            metrics.annual_cash_flow
        ));
    }

    if input.vacancy_rate > dec!(0.15) {
        warnings.push(format!(
            "Vacancy rate {:.1}% exceeds 15%: above typical market norms",
            input.vacancy_rate * dec!(100)
        ));
    }

    let variable_rate = input.vacancy_rate + input.maintenance_rate + input.management_rate;
    if variable_rate > dec!(0.5) {
        warnings.push(format!(
            "Vacancy, maintenance and management consume {:.1}% of gross rent",
            variable_rate * dec!(100)
        ));
    }

    let analysis = DealAnalysis {
        metrics,
        down_payment: down_payment(input),
        total_cash_invested: total_cash_invested(input),
        monthly_cash_flow,
        annual_noi,
        annual_debt_service,
        loan_to_value,
        debt_service_coverage_ratio,
        cap_rate,
        break_even_ratio,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    with_metadata(METHODOLOGY, input, warnings, elapsed, analysis)
}

/// `None` for a zero denominator or a quotient past the decimal range.
fn ratio(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    if denominator.is_zero() {
        return None;
    }
    numerator.checked_div(denominator)
}
