use rust_decimal::Decimal;

use crate::decimal::{Money, Rate};
use crate::errors::{AmortizationError, Result};

/// fixed end-of-period installment that repays `balance` over `remaining_months`
/// at `monthly_rate` with nothing left over (spreadsheet PMT with zero future value)
pub fn compute_payment(monthly_rate: Rate, remaining_months: u32, balance: Money) -> Result<Money> {
    if remaining_months == 0 {
        return Err(AmortizationError::InvalidTerm {
            months: remaining_months,
        });
    }

    if balance.is_negative() {
        return Err(AmortizationError::InvalidBalance { balance });
    }

    if monthly_rate.is_negative() {
        return Err(AmortizationError::InvalidInterestRate { rate: monthly_rate });
    }

    let months = Decimal::from(remaining_months);

    if monthly_rate.is_zero() {
        return Ok(balance / months);
    }

    // payment = P * r * c / (c - 1), c = (1 + r)^n
    let r = monthly_rate.as_decimal();
    let factor = match compound_factor(r, remaining_months) {
        Some(compound) => {
            let denominator = compound - Decimal::ONE;
            if denominator.is_zero() {
                // rate too small to register over this term
                return Ok(balance / months);
            }
            compound.checked_div(denominator).ok_or_else(|| overflow("annuity factor"))?
        }
        // c / (c - 1) is 1 well beyond decimal precision
        None => Decimal::ONE,
    };

    balance
        .checked_mul(r)
        .and_then(|interest| interest.checked_mul(factor))
        .ok_or_else(|| overflow("payment"))
}

/// (1 + r)^n, `None` once it no longer fits a decimal
fn compound_factor(rate: Decimal, periods: u32) -> Option<Decimal> {
    let base = Decimal::ONE + rate;
    let mut compound = Decimal::ONE;
    for _ in 0..periods {
        compound = compound.checked_mul(base)?;
    }
    Some(compound)
}

fn overflow(what: &str) -> AmortizationError {
    AmortizationError::NumericOverflow {
        parameter: "annual_interest_rate",
        message: format!("{} not representable", what),
    }
}
