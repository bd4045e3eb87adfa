use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::UnderwriteError;
use crate::types::{Money, Rate};
use crate::UnderwriteResult;

/// Level payment (PMT) that fully amortizes `principal` over `nper` periods.
///
/// Evaluated as `P * r / (1 - (1+r)^-n)`, which is the textbook
/// `P * r(1+r)^n / ((1+r)^n - 1)` rearranged so the numerator never exceeds
/// `P * r`. A zero rate amortizes straight-line.
pub fn pmt(rate: Rate, nper: u64, principal: Money) -> UnderwriteResult<Money> {
    if nper == 0 {
        return Err(UnderwriteError::InvalidInput {
            field: "nper".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    if rate < Decimal::ZERO {
        return Err(UnderwriteError::InvalidInput {
            field: "rate".into(),
            reason: "Periodic rate must not be negative".into(),
        });
    }

    if rate.is_zero() {
        return Ok(principal / Decimal::from(nper));
    }

    let one_plus_r = Decimal::ONE + rate;
    let discount = match one_plus_r.checked_powu(nper) {
        Some(factor) => Decimal::ONE / factor,
        // (1+r)^n is past the decimal range, so (1+r)^-n is below its resolution.
        None => Decimal::ZERO,
    };

    let annuity_factor = Decimal::ONE - discount;
    if annuity_factor.is_zero() {
        return Err(UnderwriteError::Overflow {
            context: "PMT annuity factor".into(),
        });
    }

    (principal * rate)
        .checked_div(annuity_factor)
        .ok_or_else(|| UnderwriteError::Overflow {
            context: "PMT division".into(),
        })
}
