use crate::config::LoanParameters;
use crate::decimal::{Money, Rate};
use crate::errors::Result;
use crate::types::{ExtraPaymentSpec, OverpaymentStrategy};

use super::annuity::compute_payment;

/// applies extra principal payments after the month's fixed installment
#[derive(Debug, Clone)]
pub struct OverpaymentHandler<'a> {
    extra_payments: &'a ExtraPaymentSpec,
    penalty_rate: Rate,
    strategy: OverpaymentStrategy,
}

/// what one month's extra payment did
#[derive(Debug, Clone, PartialEq)]
pub struct OverpaymentResult {
    /// amount asked for by the extra payment configuration
    pub requested: Money,
    /// part that reached principal
    pub applied: Money,
    /// part lost to the prepayment penalty
    pub penalty: Money,
    pub old_balance: Money,
    pub new_balance: Money,
    /// recalculated installment when the term is kept
    pub new_payment: Option<Money>,
}

impl<'a> OverpaymentHandler<'a> {
    pub fn new(
        extra_payments: &'a ExtraPaymentSpec,
        penalty_rate: Rate,
        strategy: OverpaymentStrategy,
    ) -> Self {
        Self {
            extra_payments,
            penalty_rate,
            strategy,
        }
    }

    pub fn from_params(params: &'a LoanParameters) -> Self {
        Self::new(
            &params.extra_payments,
            params.prepay_penalty_rate,
            params.overpayment_strategy,
        )
    }

    /// apply the extra payment for the zero-based `month_index`
    ///
    /// `balance` is what is left after the fixed installment and `remaining_months` the
    /// number of scheduled months after this one. returns `None` when nothing is applied.
    pub fn apply(
        &self,
        month_index: u32,
        balance: Money,
        annual_rate: Rate,
        remaining_months: u32,
    ) -> Result<Option<OverpaymentResult>> {
        if !balance.is_positive() {
            return Ok(None);
        }

        let requested = self.extra_payments.amount_for_month(month_index);
        if !requested.is_positive() {
            return Ok(None);
        }

        let share = self.penalty_rate.complement();
        let usable = (requested * share).max(Money::ZERO);
        let applied = usable.min(balance);
        if applied.is_zero() {
            return Ok(None);
        }

        // when capped, only the gross amount needed to clear the balance is prepaid
        let gross = if applied < usable { applied / share } else { requested };
        let penalty = (gross - applied).max(Money::ZERO);
        let new_balance = balance - applied;

        let new_payment = match self.strategy {
            OverpaymentStrategy::ReduceEmi if new_balance.is_positive() && remaining_months > 0 => {
                Some(compute_payment(annual_rate.monthly_rate(), remaining_months, new_balance)?)
            }
            _ => None,
        };

        Ok(Some(OverpaymentResult {
            requested,
            applied,
            penalty,
            old_balance: balance,
            new_balance,
            new_payment,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn money(s: &str) -> Money {
        Money::from_str_exact(s).unwrap()
    }

    #[test]
    fn test_penalty_reduces_extra() {
        let extra = ExtraPaymentSpec::Constant(Money::from_major(1_000));
        let handler = OverpaymentHandler::new(&extra, Rate::from_percentage(1), OverpaymentStrategy::ReduceTerm);

        let result = handler
            .apply(0, Money::from_major(50_000), Rate::from_decimal(dec!(0.052)), 299)
            .unwrap()
            .unwrap();

        assert_eq!(result.requested, Money::from_major(1_000));
        assert_eq!(result.applied, Money::from_major(990));
        assert_eq!(result.penalty, Money::from_major(10));
        assert_eq!(result.new_balance, Money::from_major(49_010));
        assert_eq!(result.new_payment, None);
    }

    #[test]
    fn test_extra_capped_at_balance() {
        let extra = ExtraPaymentSpec::Schedule(vec![Money::ZERO, Money::from_major(5_000)]);
        let handler = OverpaymentHandler::new(&extra, Rate::from_percentage(1), OverpaymentStrategy::ReduceTerm);

        let result = handler
            .apply(1, Money::from_major(99), Rate::ZERO, 10)
            .unwrap()
            .unwrap();

        assert_eq!(result.applied, Money::from_major(99));
        assert_eq!(result.new_balance, Money::ZERO);
        // 99 / 0.99 = 100 gross, 1 of it penalty
        assert_eq!(result.penalty, Money::ONE);
    }

    #[test]
    fn test_nothing_to_apply() {
        let extra = ExtraPaymentSpec::Schedule(vec![Money::from_major(500)]);
        let handler = OverpaymentHandler::new(&extra, Rate::ZERO, OverpaymentStrategy::ReduceTerm);

        // month past the schedule
        assert!(handler.apply(1, Money::from_major(100), Rate::ZERO, 5).unwrap().is_none());
        // loan already repaid by the fixed installment
        assert!(handler.apply(0, Money::ZERO, Rate::ZERO, 5).unwrap().is_none());
    }

    #[test]
    fn test_reduce_emi_recalculates_payment() {
        let extra = ExtraPaymentSpec::Constant(Money::from_major(10_000));
        let handler = OverpaymentHandler::new(&extra, Rate::ZERO, OverpaymentStrategy::ReduceEmi);

        let result = handler
            .apply(0, Money::from_major(22_000), Rate::ZERO, 12)
            .unwrap()
            .unwrap();

        assert_eq!(result.new_balance, Money::from_major(12_000));
        assert_eq!(result.new_payment, Some(Money::from_major(1_000)));
    }

    #[test]
    fn test_reduce_emi_in_final_month_keeps_payment() {
        let extra = ExtraPaymentSpec::Constant(money("10"));
        let handler = OverpaymentHandler::new(&extra, Rate::ZERO, OverpaymentStrategy::ReduceEmi);

        let result = handler.apply(11, money("50"), Rate::ZERO, 0).unwrap().unwrap();
        assert_eq!(result.new_balance, money("40"));
        assert_eq!(result.new_payment, None);
    }
}
