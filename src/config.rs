use hourglass_rs::{SafeTimeProvider, TimeSource};
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{AmortizationError, Result};
use crate::types::{ExtraPaymentSpec, OverpaymentStrategy, RateChange, YearMonth};

/// longest accepted term, 100 years
pub const MAX_TERM_MONTHS: u32 = 1_200;

fn default_penalty_rate() -> Rate {
    Rate::from_decimal(dec!(0.01))
}

/// accepts a strategy name or the `reduce_term_on_extra` boolean
fn strategy_or_flag<'de, D>(deserializer: D) -> std::result::Result<OverpaymentStrategy, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StrategyOrFlag {
        Strategy(OverpaymentStrategy),
        ReduceTerm(bool),
    }

    Ok(match StrategyOrFlag::deserialize(deserializer)? {
        StrategyOrFlag::Strategy(strategy) => strategy,
        StrategyOrFlag::ReduceTerm(reduce_term) => reduce_term.into(),
    })
}

/// inputs of one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanParameters {
    /// initial principal balance
    pub loan_amount: Money,
    /// number of scheduled monthly payments, at most `MAX_TERM_MONTHS`
    pub term_months: u32,
    /// fraction, e.g. 0.0488 for 4.88%
    pub annual_interest_rate: Rate,
    /// added to every payment, never amortized
    #[serde(default)]
    pub monthly_fees: Money,
    #[serde(default)]
    pub extra_payments: ExtraPaymentSpec,
    /// share of each extra payment lost to the lender
    #[serde(default = "default_penalty_rate")]
    pub prepay_penalty_rate: Rate,
    #[serde(default, alias = "reduce_term_on_extra", deserialize_with = "strategy_or_flag")]
    pub overpayment_strategy: OverpaymentStrategy,
    /// strictly increasing by month
    #[serde(default)]
    pub rate_changes: Vec<RateChange>,
    /// recompute the installment when a rate change fires
    #[serde(default)]
    pub recalculate_on_rate_change: bool,
    /// month of the first payment
    #[serde(default)]
    pub start_date: Option<YearMonth>,
    /// payments after this month are reported as still outstanding
    #[serde(default)]
    pub reference_date: Option<YearMonth>,
}

impl LoanParameters {
    /// plain fixed-rate loan with every optional input at its default
    pub fn new(loan_amount: Money, term_months: u32, annual_interest_rate: Rate) -> Self {
        Self {
            loan_amount,
            term_months,
            annual_interest_rate,
            monthly_fees: Money::ZERO,
            extra_payments: ExtraPaymentSpec::none(),
            prepay_penalty_rate: default_penalty_rate(),
            overpayment_strategy: OverpaymentStrategy::ReduceTerm,
            rate_changes: Vec::new(),
            recalculate_on_rate_change: false,
            start_date: None,
            reference_date: None,
        }
    }

    pub fn builder() -> LoanParametersBuilder {
        LoanParametersBuilder::new()
    }

    /// parse and validate from json
    pub fn from_json(json: &str) -> Result<Self> {
        let params: LoanParameters = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// true keeps the installment and shortens the term
    pub fn reduce_term_on_extra(&self) -> bool {
        self.overpayment_strategy == OverpaymentStrategy::ReduceTerm
    }

    pub fn has_extra_payments(&self) -> bool {
        self.extra_payments.is_configured()
    }

    /// same loan with extra payments switched off
    pub fn without_extra_payments(&self) -> Self {
        Self {
            extra_payments: ExtraPaymentSpec::none(),
            ..self.clone()
        }
    }

    /// check every constraint, first violation wins
    pub fn validate(&self) -> Result<()> {
        if !self.loan_amount.is_positive() {
            return Err(AmortizationError::InvalidLoanAmount {
                amount: self.loan_amount,
            });
        }

        if self.term_months == 0 || self.term_months > MAX_TERM_MONTHS {
            return Err(AmortizationError::InvalidTerm {
                months: self.term_months,
            });
        }

        if self.annual_interest_rate.is_negative() {
            return Err(AmortizationError::InvalidInterestRate {
                rate: self.annual_interest_rate,
            });
        }

        if self.monthly_fees.is_negative() {
            return Err(AmortizationError::InvalidMonthlyFees {
                amount: self.monthly_fees,
            });
        }

        self.extra_payments.validate()?;

        if self.prepay_penalty_rate.is_negative() || self.prepay_penalty_rate >= Rate::ONE {
            return Err(AmortizationError::InvalidPenaltyRate {
                rate: self.prepay_penalty_rate,
            });
        }

        self.validate_rate_changes()?;
        self.validate_dates()
    }

    fn validate_rate_changes(&self) -> Result<()> {
        let mut previous_month = 0;

        for change in &self.rate_changes {
            let month = change.effective_from_month;

            if month == 0 || month > self.term_months {
                return Err(AmortizationError::InvalidRateChange {
                    month,
                    message: format!("month must be within 1..={}", self.term_months),
                });
            }

            if month <= previous_month {
                return Err(AmortizationError::InvalidRateChange {
                    month,
                    message: format!("must come after month {}", previous_month),
                });
            }

            if change.annual_rate.is_negative() {
                return Err(AmortizationError::InvalidInterestRate {
                    rate: change.annual_rate,
                });
            }

            previous_month = month;
        }

        Ok(())
    }

    fn validate_dates(&self) -> Result<()> {
        if let Some(start) = &self.start_date {
            start.validate()?;
        }

        if let Some(reference) = &self.reference_date {
            reference.validate()?;

            if self.start_date.is_none() {
                return Err(AmortizationError::InvalidDate {
                    message: "reference date requires a start date".to_string(),
                });
            }
        }

        Ok(())
    }
}

/// builder for loan parameters
#[derive(Debug, Default)]
pub struct LoanParametersBuilder {
    loan_amount: Option<Money>,
    term_months: Option<u32>,
    annual_interest_rate: Option<Rate>,
    monthly_fees: Option<Money>,
    extra_payments: Option<ExtraPaymentSpec>,
    prepay_penalty_rate: Option<Rate>,
    overpayment_strategy: Option<OverpaymentStrategy>,
    rate_changes: Vec<RateChange>,
    recalculate_on_rate_change: bool,
    start_date: Option<YearMonth>,
    reference_date: Option<YearMonth>,
}

impl LoanParametersBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loan_amount(mut self, amount: Money) -> Self {
        self.loan_amount = Some(amount);
        self
    }

    pub fn term_months(mut self, months: u32) -> Self {
        self.term_months = Some(months);
        self
    }

    pub fn rate(mut self, rate: Rate) -> Self {
        self.annual_interest_rate = Some(rate);
        self
    }

    pub fn monthly_fees(mut self, fees: Money) -> Self {
        self.monthly_fees = Some(fees);
        self
    }

    pub fn extra_payments(mut self, extra: impl Into<ExtraPaymentSpec>) -> Self {
        self.extra_payments = Some(extra.into());
        self
    }

    pub fn prepay_penalty_rate(mut self, rate: Rate) -> Self {
        self.prepay_penalty_rate = Some(rate);
        self
    }

    pub fn reduce_term_on_extra(mut self, reduce_term: bool) -> Self {
        self.overpayment_strategy = Some(reduce_term.into());
        self
    }

    pub fn rate_change(mut self, effective_from_month: u32, annual_rate: Rate) -> Self {
        self.rate_changes.push(RateChange::new(effective_from_month, annual_rate));
        self
    }

    pub fn recalculate_on_rate_change(mut self, recalculate: bool) -> Self {
        self.recalculate_on_rate_change = recalculate;
        self
    }

    pub fn start_date(mut self, start: YearMonth) -> Self {
        self.start_date = Some(start);
        self
    }

    pub fn reference_date(mut self, reference: YearMonth) -> Self {
        self.reference_date = Some(reference);
        self
    }

    /// use the current month of the given clock as reference date
    pub fn reference_date_from(mut self, time: &SafeTimeProvider) -> Self {
        self.reference_date = Some(YearMonth::from(time.now()));
        self
    }

    /// use the current month of the system clock as reference date
    pub fn reference_date_now(self) -> Self {
        let time = SafeTimeProvider::new(TimeSource::System);
        self.reference_date_from(&time)
    }

    pub fn build(self) -> Result<LoanParameters> {
        let loan_amount = self.loan_amount.ok_or(AmortizationError::InvalidConfiguration {
            message: "loan amount required".to_string(),
        })?;

        let term_months = self.term_months.ok_or(AmortizationError::InvalidConfiguration {
            message: "term required".to_string(),
        })?;

        let rate = self.annual_interest_rate.ok_or(AmortizationError::InvalidConfiguration {
            message: "interest rate required".to_string(),
        })?;

        let mut params = LoanParameters::new(loan_amount, term_months, rate);
        if let Some(fees) = self.monthly_fees {
            params.monthly_fees = fees;
        }
        if let Some(extra) = self.extra_payments {
            params.extra_payments = extra;
        }
        if let Some(penalty) = self.prepay_penalty_rate {
            params.prepay_penalty_rate = penalty;
        }
        if let Some(strategy) = self.overpayment_strategy {
            params.overpayment_strategy = strategy;
        }
        params.rate_changes = self.rate_changes;
        params.recalculate_on_rate_change = self.recalculate_on_rate_change;
        params.start_date = self.start_date;
        params.reference_date = self.reference_date;

        params.validate()?;
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn base() -> LoanParametersBuilder {
        LoanParameters::builder()
            .loan_amount(Money::from_major(100_000))
            .term_months(300)
            .rate(Rate::from_decimal(dec!(0.052)))
    }

    #[test]
    fn test_defaults() {
        let params = base().build().unwrap();
        assert_eq!(params.monthly_fees, Money::ZERO);
        assert_eq!(params.prepay_penalty_rate, Rate::from_percentage(1));
        assert!(params.reduce_term_on_extra());
        assert!(!params.has_extra_payments());
        assert!(params.rate_changes.is_empty());
    }

    #[test]
    fn test_missing_required_field() {
        let err = LoanParameters::builder()
            .term_months(12)
            .rate(Rate::ZERO)
            .build()
            .unwrap_err();
        assert!(matches!(err, AmortizationError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_rejects_invalid_inputs() {
        let err = base().loan_amount(Money::ZERO).build().unwrap_err();
        assert_eq!(err.parameter(), "loan_amount");

        let err = base().term_months(0).build().unwrap_err();
        assert_eq!(err.parameter(), "term_months");

        let err = base().rate(Rate::from_decimal(dec!(-0.01))).build().unwrap_err();
        assert_eq!(err.parameter(), "annual_interest_rate");

        let err = base().monthly_fees(Money::from_major(-1)).build().unwrap_err();
        assert_eq!(err.parameter(), "monthly_fees");

        let err = base()
            .extra_payments(vec![Money::ZERO, Money::from_major(-100)])
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            AmortizationError::InvalidExtraPayment { month: 2, amount: Money::from_major(-100) }
        );

        let err = base().prepay_penalty_rate(Rate::ONE).build().unwrap_err();
        assert_eq!(err.parameter(), "prepay_penalty_rate");
    }

    #[test]
    fn test_rate_change_validation() {
        let rate = Rate::from_bps(447);

        assert!(base().rate_change(120, rate).build().is_ok());
        assert!(base().rate_change(0, rate).build().is_err());
        assert!(base().rate_change(301, rate).build().is_err());
        assert!(base().rate_change(120, rate).rate_change(120, rate).build().is_err());
        assert!(base().rate_change(120, rate).rate_change(60, rate).build().is_err());

        let err = base()
            .rate_change(120, Rate::from_decimal(dec!(-0.01)))
            .build()
            .unwrap_err();
        assert_eq!(err.parameter(), "annual_interest_rate");
    }

    #[test]
    fn test_reference_date_requires_start() {
        let err = base()
            .reference_date(YearMonth::new(2030, 1).unwrap())
            .build()
            .unwrap_err();
        assert!(matches!(err, AmortizationError::InvalidDate { .. }));
    }

    #[test]
    fn test_reference_date_from_clock() {
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2025, 6, 15, 0, 0, 0).unwrap(),
        ));

        let params = base()
            .start_date(YearMonth::new(2021, 11).unwrap())
            .reference_date_from(&time)
            .build()
            .unwrap();
        assert_eq!(params.reference_date, Some(YearMonth::new(2025, 6).unwrap()));
    }

    #[test]
    fn test_from_json_with_defaults() {
        let params = LoanParameters::from_json(
            r#"{
                "loan_amount": "380000",
                "term_months": 210,
                "annual_interest_rate": "0.0488",
                "monthly_fees": "47.5",
                "extra_payments": ["420", "4200", "42000"],
                "prepay_penalty_rate": "0"
            }"#,
        )
        .unwrap();

        assert_eq!(params.term_months, 210);
        assert_eq!(params.monthly_fees, Money::from_str_exact("47.5").unwrap());
        assert_eq!(params.extra_payments.amount_for_month(2), Money::from_major(42_000));
        assert_eq!(params.prepay_penalty_rate, Rate::ZERO);
        assert_eq!(params.overpayment_strategy, OverpaymentStrategy::ReduceTerm);
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        let err = LoanParameters::from_json(
            r#"{"loan_amount": "-1", "term_months": 12, "annual_interest_rate": "0.05"}"#,
        )
        .unwrap_err();
        assert_eq!(err.parameter(), "loan_amount");

        let err = LoanParameters::from_json("{").unwrap_err();
        assert!(matches!(err, AmortizationError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_term_upper_bound() {
        assert!(base().term_months(MAX_TERM_MONTHS).build().is_ok());
        assert_eq!(
            base().term_months(MAX_TERM_MONTHS + 1).build().unwrap_err(),
            AmortizationError::InvalidTerm { months: MAX_TERM_MONTHS + 1 }
        );

        let params = LoanParameters::new(Money::from_major(1_000), u32::MAX, Rate::ZERO);
        assert_eq!(params.validate(), Err(AmortizationError::InvalidTerm { months: u32::MAX }));
    }

    #[test]
    fn test_from_json_reduce_term_flag() {
        let json = |extra: &str| {
            format!(
                r#"{{"loan_amount": "100000", "term_months": 300, "annual_interest_rate": "0.052"{}}}"#,
                extra
            )
        };

        let params = LoanParameters::from_json(&json(r#", "reduce_term_on_extra": false"#)).unwrap();
        assert_eq!(params.overpayment_strategy, OverpaymentStrategy::ReduceEmi);
        assert!(!params.reduce_term_on_extra());

        let params = LoanParameters::from_json(&json(r#", "reduce_term_on_extra": true"#)).unwrap();
        assert_eq!(params.overpayment_strategy, OverpaymentStrategy::ReduceTerm);

        let params = LoanParameters::from_json(&json(r#", "overpayment_strategy": "ReduceEmi""#)).unwrap();
        assert_eq!(params.overpayment_strategy, OverpaymentStrategy::ReduceEmi);

        let params = LoanParameters::from_json(&json("")).unwrap();
        assert_eq!(params.overpayment_strategy, OverpaymentStrategy::ReduceTerm);
    }

    #[test]
    fn test_without_extra_payments() {
        let params = base().extra_payments(Money::from_major(1_000)).build().unwrap();
        let baseline = params.without_extra_payments();
        assert!(params.has_extra_payments());
        assert!(!baseline.has_extra_payments());
        assert_eq!(baseline.loan_amount, params.loan_amount);
    }
}
