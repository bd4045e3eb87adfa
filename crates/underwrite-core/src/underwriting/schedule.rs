use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::deal::{loan_amount, loan_periods, monthly_rate, validate_deal, DealInput};
use crate::time_value;
use crate::types::{Money, MONTHS_PER_YEAR};
use crate::UnderwriteResult;

/// One loan year of the amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// 1-based loan year
    pub year: u32,
    pub beginning_balance: Money,
    pub interest_paid: Money,
    pub principal_paid: Money,
    pub ending_balance: Money,
}

/// Year-by-year amortization of the deal's loan.
///
/// Uses the same level payment as [`super::underwrite`]. The degenerate
/// investment check does not apply: a fully financed deal still has a
/// well-defined loan.
pub fn amortization_schedule(input: &DealInput) -> UnderwriteResult<Vec<AmortizationRow>> {
    validate_deal(input)?;

    let principal = loan_amount(input);
    let rate = monthly_rate(input);
    let periods = loan_periods(input);
    let payment = time_value::pmt(rate, periods, principal)?;

    let mut rows = Vec::with_capacity(input.loan_term_years.unsigned_abs() as usize);
    let mut balance = principal;
    let mut month: u64 = 0;

    for year in 1..=input.loan_term_years.unsigned_abs() {
        let beginning_balance = balance;
        let mut interest_paid = Decimal::ZERO;
        let mut principal_paid = Decimal::ZERO;

        for _ in 0..MONTHS_PER_YEAR {
            month += 1;
            let interest = balance * rate;
            // The final payment retires whatever the level payment left over.
            let principal_part = if month == periods {
                balance
            } else {
                (payment - interest).min(balance)
            };
            interest_paid += interest;
            principal_paid += principal_part;
            balance -= principal_part;
        }

        rows.push(AmortizationRow {
            year,
            beginning_balance,
            interest_paid,
            principal_paid,
            ending_balance: balance,
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UnderwriteError;
    use rust_decimal_macros::dec;

    fn financed_deal() -> DealInput {
        DealInput {
            purchase_price: dec!(300000),
            rehab_cost: dec!(0),
            monthly_rent: dec!(2500),
            annual_taxes: dec!(3600),
            annual_insurance: dec!(1200),
            monthly_hoa: dec!(0),
            vacancy_rate: dec!(0.05),
            maintenance_rate: dec!(0.08),
            management_rate: dec!(0.08),
            interest_rate: dec!(0.065),
            loan_term_years: 30,
            down_payment_percent: dec!(0.2),
        }
    }

    #[test]
    fn test_one_row_per_year() {
        let rows = amortization_schedule(&financed_deal()).unwrap();
        assert_eq!(rows.len(), 30);
        assert_eq!(rows[0].year, 1);
        assert_eq!(rows[29].year, 30);
    }

    #[test]
    fn test_balance_chains_and_retires() {
        let rows = amortization_schedule(&financed_deal()).unwrap();
        assert_eq!(rows[0].beginning_balance, dec!(240000));
        for pair in rows.windows(2) {
            assert_eq!(pair[0].ending_balance, pair[1].beginning_balance);
        }
        assert_eq!(rows.last().unwrap().ending_balance, Decimal::ZERO);

        let total_principal: Decimal = rows.iter().map(|r| r.principal_paid).sum();
        assert!((total_principal - dec!(240000)).abs() < dec!(0.000001));
    }

    #[test]
    fn test_first_year_interest_dominates() {
        let rows = amortization_schedule(&financed_deal()).unwrap();
        // Year 1 of a 6.5% 30-year loan is mostly interest (~$15.5k of ~$18.2k)
        assert!(rows[0].interest_paid > dec!(15000) && rows[0].interest_paid < dec!(16000));
        assert!(rows[0].interest_paid > rows[0].principal_paid);
        assert!(rows[29].interest_paid < rows[29].principal_paid);
    }

    #[test]
    fn test_zero_rate_straight_line() {
        let mut input = financed_deal();
        input.interest_rate = Decimal::ZERO;
        input.loan_term_years = 10;
        let rows = amortization_schedule(&input).unwrap();
        assert_eq!(rows.len(), 10);
        for row in &rows {
            assert_eq!(row.interest_paid, Decimal::ZERO);
            assert_eq!(row.principal_paid, dec!(24000));
        }
    }

    #[test]
    fn test_degenerate_investment_still_has_schedule() {
        let mut input = financed_deal();
        input.down_payment_percent = Decimal::ZERO;
        let rows = amortization_schedule(&input).unwrap();
        assert_eq!(rows[0].beginning_balance, dec!(300000));
    }

    #[test]
    fn test_invalid_term_rejected() {
        let mut input = financed_deal();
        input.loan_term_years = 0;
        let err = amortization_schedule(&input).unwrap_err();
        assert!(matches!(err, UnderwriteError::InvalidInput { ref field, .. } if field == "loan_term_years"));
    }

    #[test]
    fn test_unbounded_term_rejected_before_allocating() {
        let mut input = financed_deal();
        input.loan_term_years = i32::MAX;
        let err = amortization_schedule(&input).unwrap_err();
        assert_eq!(err.field(), Some("loan_term_years"));
    }

    #[test]
    fn test_longest_term_schedule() {
        let mut input = financed_deal();
        input.loan_term_years = 100;
        let rows = amortization_schedule(&input).unwrap();
        assert_eq!(rows.len(), 100);
        assert_eq!(rows.last().unwrap().ending_balance, Decimal::ZERO);
    }
}
