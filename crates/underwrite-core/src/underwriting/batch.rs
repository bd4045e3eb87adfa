use super::deal::{underwrite, DealInput, DealMetrics};
use crate::UnderwriteResult;

/// Underwrite many deals independently.
///
/// Output order matches input order; one deal failing never affects another.
/// With the `parallel` feature the deals are spread over the rayon pool.
pub fn underwrite_batch(deals: &[DealInput]) -> Vec<UnderwriteResult<DealMetrics>> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        deals.par_iter().map(underwrite).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        deals.iter().map(underwrite).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UnderwriteError;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn deal(purchase_price: Decimal, loan_term_years: i32) -> DealInput {
        DealInput {
            purchase_price,
            rehab_cost: dec!(10000),
            monthly_rent: dec!(2000),
            annual_taxes: dec!(2400),
            annual_insurance: dec!(1200),
            monthly_hoa: dec!(50),
            vacancy_rate: dec!(0.05),
            maintenance_rate: dec!(0.05),
            management_rate: dec!(0.1),
            interest_rate: dec!(0.06),
            loan_term_years,
            down_payment_percent: dec!(0.25),
        }
    }

    #[test]
    fn test_batch_preserves_order() {
        let deals = vec![deal(dec!(100000), 30), deal(dec!(200000), 30), deal(dec!(400000), 15)];
        let results = underwrite_batch(&deals);
        assert_eq!(results.len(), 3);
        for (input, result) in deals.iter().zip(&results) {
            let metrics = result.as_ref().unwrap();
            assert_eq!(metrics.loan_amount, input.purchase_price * dec!(0.75));
        }
    }

    #[test]
    fn test_batch_isolates_failures() {
        let deals = vec![deal(dec!(100000), 30), deal(dec!(100000), 0), deal(dec!(300000), 30)];
        let results = underwrite_batch(&deals);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(UnderwriteError::InvalidInput { .. })));
        assert!(results[2].is_ok());
    }

    #[test]
    fn test_batch_matches_single_calls() {
        let deals = vec![deal(dec!(150000), 20), deal(dec!(250000), 30)];
        let results = underwrite_batch(&deals);
        for (input, result) in deals.iter().zip(results) {
            assert_eq!(result.unwrap(), underwrite(input).unwrap());
        }
    }

    #[test]
    fn test_empty_batch() {
        assert!(underwrite_batch(&[]).is_empty());
    }
}
