use thiserror::Error;

use crate::decimal::{Money, Rate};

/// every variant is an input validation failure raised before (or instead of) producing a result
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AmortizationError {
    #[error("invalid loan amount: {amount} (must be positive)")]
    InvalidLoanAmount {
        amount: Money,
    },

    #[error("invalid term: {months} months (must be 1..={max})", max = crate::config::MAX_TERM_MONTHS)]
    InvalidTerm {
        months: u32,
    },

    #[error("invalid interest rate: {rate} (must not be negative)")]
    InvalidInterestRate {
        rate: Rate,
    },

    #[error("invalid monthly fees: {amount} (must not be negative)")]
    InvalidMonthlyFees {
        amount: Money,
    },

    #[error("invalid extra payment for month {month}: {amount} (must not be negative)")]
    InvalidExtraPayment {
        month: u32,
        amount: Money,
    },

    #[error("invalid prepayment penalty rate: {rate} (must be in [0, 1))")]
    InvalidPenaltyRate {
        rate: Rate,
    },

    #[error("invalid rate change at month {month}: {message}")]
    InvalidRateChange {
        month: u32,
        message: String,
    },

    #[error("invalid balance: {balance} (must not be negative)")]
    InvalidBalance {
        balance: Money,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },

    #[error("numeric overflow in {parameter}: {message}")]
    NumericOverflow {
        parameter: &'static str,
        message: String,
    },

    #[error("no extra payments configured")]
    ExtraPaymentsNotConfigured,

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },
}

impl AmortizationError {
    /// name of the input parameter that violated its constraint
    pub fn parameter(&self) -> &'static str {
        match self {
            AmortizationError::InvalidLoanAmount { .. } => "loan_amount",
            AmortizationError::InvalidTerm { .. } => "term_months",
            AmortizationError::InvalidInterestRate { .. } => "annual_interest_rate",
            AmortizationError::InvalidMonthlyFees { .. } => "monthly_fees",
            AmortizationError::InvalidExtraPayment { .. } => "extra_payments",
            AmortizationError::ExtraPaymentsNotConfigured => "extra_payments",
            AmortizationError::InvalidPenaltyRate { .. } => "prepay_penalty_rate",
            AmortizationError::InvalidRateChange { .. } => "rate_changes",
            AmortizationError::InvalidBalance { .. } => "balance",
            AmortizationError::InvalidDate { .. } => "dates",
            AmortizationError::NumericOverflow { parameter, .. } => *parameter,
            AmortizationError::InvalidConfiguration { .. } => "configuration",
        }
    }
}

impl From<serde_json::Error> for AmortizationError {
    fn from(err: serde_json::Error) -> Self {
        AmortizationError::InvalidConfiguration {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AmortizationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_names_parameter() {
        let err = AmortizationError::InvalidTerm { months: 0 };
        assert_eq!(err.parameter(), "term_months");
        assert_eq!(err.to_string(), "invalid term: 0 months (must be 1..=1200)");

        let err = AmortizationError::NumericOverflow {
            parameter: "annual_interest_rate",
            message: "payment not representable".to_string(),
        };
        assert_eq!(err.parameter(), "annual_interest_rate");
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: AmortizationError = json_err.into();
        assert_eq!(err.parameter(), "configuration");
    }
}
