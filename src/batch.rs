use log::debug;
#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::config::LoanParameters;
use crate::errors::Result;
use crate::payments::{simulate, SimulationResult};

/// simulate independent loans, results in input order
///
/// each loan succeeds or fails on its own; one invalid set of parameters does not
/// abort the others. runs on the rayon pool with the `parallel` feature.
pub fn simulate_many(loans: &[LoanParameters]) -> Vec<Result<SimulationResult>> {
    debug!("simulating {} loans", loans.len());

    #[cfg(feature = "parallel")]
    let results = loans.par_iter().map(simulate).collect();

    #[cfg(not(feature = "parallel"))]
    let results = loans.iter().map(simulate).collect();

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::{Money, Rate};
    use crate::errors::AmortizationError;
    use crate::types::ExtraPaymentSpec;
    use rust_decimal_macros::dec;

    fn loan(amount: i64, months: u32) -> LoanParameters {
        LoanParameters::new(Money::from_major(amount), months, Rate::from_decimal(dec!(0.052)))
    }

    #[test]
    fn test_results_keep_input_order() {
        let loans: Vec<_> = (1..=20).map(|i| loan(10_000 * i, 12 * i as u32)).collect();
        let results = simulate_many(&loans);

        assert_eq!(results.len(), 20);
        for (params, result) in loans.iter().zip(&results) {
            let result = result.as_ref().unwrap();
            assert_eq!(result.loan_amount, params.loan_amount);
            assert_eq!(result.months_paid(), params.term_months);
        }
    }

    #[test]
    fn test_matches_sequential_runs() {
        let mut with_extra = loan(100_000, 300);
        with_extra.extra_payments = ExtraPaymentSpec::Constant(Money::from_major(1_000));
        let loans = vec![loan(100_000, 300), with_extra];

        let results = simulate_many(&loans);
        for (params, result) in loans.iter().zip(results) {
            assert_eq!(result.unwrap(), simulate(params).unwrap());
        }
    }

    #[test]
    fn test_failure_is_isolated() {
        let loans = vec![loan(50_000, 120), loan(50_000, 0), loan(-1, 120)];
        let results = simulate_many(&loans);

        assert!(results[0].is_ok());
        assert_eq!(
            results[1].as_ref().unwrap_err(),
            &AmortizationError::InvalidTerm { months: 0 }
        );
        assert!(matches!(
            results[2].as_ref().unwrap_err(),
            AmortizationError::InvalidLoanAmount { .. }
        ));
    }

    #[test]
    fn test_empty_batch() {
        assert!(simulate_many(&[]).is_empty());
    }
}
