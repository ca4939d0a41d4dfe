use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::config::LoanParameters;
use crate::decimal::{Money, Rate};
use crate::errors::{AmortizationError, Result};
use crate::events::{Event, EventStore, PaymentReason};
use crate::interest::RateSchedule;
use crate::types::{PayoffStatus, YearMonth};

use super::annuity::compute_payment;
use super::overpayment::OverpaymentHandler;

/// one simulated month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// 1-based
    pub month: u32,
    pub payment_date: Option<YearMonth>,
    pub remaining_balance: Money,
    /// principal + interest + fee actually paid this month
    pub total_monthly_payment: Money,
    /// fixed installment in force after this month
    pub scheduled_payment: Money,
    /// includes `extra_principal`
    pub principal_paid: Money,
    pub interest_paid: Money,
    pub extra_principal: Money,
    pub prepayment_penalty: Money,
    pub fee: Money,
    pub annual_rate: Rate,
    pub cumulative_principal: Money,
    pub cumulative_interest: Money,
}

/// interest and principal still due after the reference month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RemainingTotals {
    pub reference_date: YearMonth,
    pub payments: u32,
    pub interest: Money,
    pub principal: Money,
}

impl RemainingTotals {
    fn new(reference_date: YearMonth) -> Self {
        Self {
            reference_date,
            payments: 0,
            interest: Money::ZERO,
            principal: Money::ZERO,
        }
    }

    fn record(&mut self, date: YearMonth, interest: Money, principal: Money) {
        if date > self.reference_date {
            self.payments += 1;
            self.interest += interest;
            self.principal += principal;
        }
    }
}

/// complete schedule of one run plus its aggregates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub loan_amount: Money,
    pub term_months: u32,
    pub annual_interest_rate: Rate,
    pub monthly_fees: Money,
    /// installment computed at origination
    pub initial_payment: Money,
    pub entries: Vec<ScheduleEntry>,
    pub status: PayoffStatus,
    pub total_fees: Money,
    pub total_interest: Money,
    pub total_principal: Money,
    pub total_penalties: Money,
    pub total_extra_principal: Money,
    pub end_date: Option<YearMonth>,
    pub remaining_after_reference: Option<RemainingTotals>,
    pub events: Vec<Event>,
}

impl SimulationResult {
    /// number of months actually paid
    pub fn months_paid(&self) -> u32 {
        self.entries.len() as u32
    }

    pub fn final_cumulative_interest(&self) -> Money {
        self.total_interest
    }

    pub fn final_cumulative_principal(&self) -> Money {
        self.total_principal
    }

    pub fn final_balance(&self) -> Money {
        self.entries
            .last()
            .map(|e| e.remaining_balance)
            .unwrap_or(self.loan_amount)
    }

    pub fn is_paid_off(&self) -> bool {
        self.status.is_paid_off()
    }

    /// entry for a 1-based month
    pub fn get_entry(&self, month: u32) -> Option<&ScheduleEntry> {
        month
            .checked_sub(1)
            .and_then(|index| self.entries.get(index as usize))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// runs the month-by-month recurrence for one set of parameters
pub struct AmortizationCalculator<'a> {
    params: &'a LoanParameters,
}

impl<'a> AmortizationCalculator<'a> {
    pub fn new(params: &'a LoanParameters) -> Self {
        Self { params }
    }

    pub fn run(&self) -> Result<SimulationResult> {
        let params = self.params;
        params.validate()?;

        let term = params.term_months;
        let rates = RateSchedule::new(params.annual_interest_rate, &params.rate_changes);
        let overpayments = OverpaymentHandler::from_params(params);
        let mut events = EventStore::new();

        let mut rate = rates.base_rate();
        let mut payment = compute_payment(rate.monthly_rate(), term, params.loan_amount)?;
        let initial_payment = payment;
        events.emit(Event::PaymentCalculated {
            month: 1,
            payment,
            reason: PaymentReason::Origination,
        });

        debug!(
            "simulating loan of {} over {} months at {}, installment {:.2}",
            params.loan_amount, term, rate, payment
        );

        let mut balance = params.loan_amount;
        let mut entries = Vec::with_capacity(term as usize);
        let mut cumulative_principal = Money::ZERO;
        let mut cumulative_interest = Money::ZERO;
        let mut total_fees = Money::ZERO;
        let mut total_penalties = Money::ZERO;
        let mut total_extra_principal = Money::ZERO;
        let mut remaining = params.reference_date.map(RemainingTotals::new);

        for index in 0..term {
            if !balance.is_positive() {
                break;
            }
            let month = index + 1;

            let previous_rate = rate;
            rate = rates.rate_for_month(month);

            if rates.change_at(month).is_some() {
                debug!("month {}: rate {} -> {}", month, previous_rate, rate);
                events.emit(Event::InterestRateChanged {
                    month,
                    old_rate: previous_rate,
                    new_rate: rate,
                });

                if params.recalculate_on_rate_change {
                    payment = compute_payment(rate.monthly_rate(), term - index, balance)?;
                    debug!("month {}: installment recalculated to {:.2}", month, payment);
                    events.emit(Event::PaymentCalculated {
                        month,
                        payment,
                        reason: PaymentReason::RateChange,
                    });
                }
            }

            let interest = rates.interest_for_month(balance, month)?;
            let scheduled_principal = payment - interest;
            if scheduled_principal.is_negative() {
                return Err(AmortizationError::InvalidRateChange {
                    month,
                    message: format!(
                        "installment {:.2} does not cover interest {:.2}",
                        payment, interest
                    ),
                });
            }

            let mut principal = scheduled_principal.min(balance);
            balance -= principal;

            let mut extra_principal = Money::ZERO;
            let mut penalty = Money::ZERO;
            if let Some(extra) = overpayments.apply(index, balance, rate, term - month)? {
                principal += extra.applied;
                balance = extra.new_balance;
                extra_principal = extra.applied;
                penalty = extra.penalty;
                events.emit(Event::ExtraPaymentApplied {
                    month,
                    requested: extra.requested,
                    applied: extra.applied,
                    penalty: extra.penalty,
                });

                if let Some(new_payment) = extra.new_payment {
                    debug!("month {}: installment recalculated to {:.2}", month, new_payment);
                    payment = new_payment;
                    events.emit(Event::PaymentCalculated {
                        month: month + 1,
                        payment,
                        reason: PaymentReason::ExtraPayment,
                    });
                }
            }

            // sub-cent rounding residue in the final scheduled month
            if month == term && balance.is_positive() && balance < Money::CENT {
                principal += balance;
                balance = Money::ZERO;
            }

            cumulative_principal = checked_total(cumulative_principal, principal, "loan_amount", month)?;
            cumulative_interest =
                checked_total(cumulative_interest, interest, "annual_interest_rate", month)?;
            total_fees = checked_total(total_fees, params.monthly_fees, "monthly_fees", month)?;
            total_penalties = checked_total(total_penalties, penalty, "prepay_penalty_rate", month)?;
            total_extra_principal =
                checked_total(total_extra_principal, extra_principal, "extra_payments", month)?;
            let total_monthly_payment = principal
                .checked_add(interest)
                .and_then(|paid| paid.checked_add(params.monthly_fees))
                .ok_or_else(|| overflow("monthly_fees", month))?;

            let payment_date = params.start_date.map(|start| start.add_months(index));
            if let (Some(totals), Some(date)) = (remaining.as_mut(), payment_date) {
                totals.record(date, interest, principal);
            }

            trace!(
                "month {}: balance {:.2}, principal {:.2}, interest {:.2}",
                month, balance, principal, interest
            );

            entries.push(ScheduleEntry {
                month,
                payment_date,
                remaining_balance: balance,
                total_monthly_payment,
                scheduled_payment: payment,
                principal_paid: principal,
                interest_paid: interest,
                extra_principal,
                prepayment_penalty: penalty,
                fee: params.monthly_fees,
                annual_rate: rate,
                cumulative_principal,
                cumulative_interest,
            });
        }

        let months_paid = entries.len() as u32;
        let status = if balance.is_positive() {
            warn!("term of {} months exhausted with {:.2} outstanding", term, balance);
            events.emit(Event::TermExhausted { outstanding: balance });
            PayoffStatus::TermExhausted { outstanding: balance }
        } else {
            events.emit(Event::LoanPaidOff { month: months_paid });
            PayoffStatus::PaidOff { month: months_paid }
        };

        debug!(
            "schedule finished after {} months: interest {:.2}, principal {:.2}, fees {:.2}",
            months_paid, cumulative_interest, cumulative_principal, total_fees
        );

        let end_date = entries.last().and_then(|e| e.payment_date);

        Ok(SimulationResult {
            loan_amount: params.loan_amount,
            term_months: term,
            annual_interest_rate: params.annual_interest_rate,
            monthly_fees: params.monthly_fees,
            initial_payment,
            entries,
            status,
            total_fees,
            total_interest: cumulative_interest,
            total_principal: cumulative_principal,
            total_penalties,
            total_extra_principal,
            end_date,
            remaining_after_reference: remaining,
            events: events.take_events(),
        })
    }
}

fn checked_total(total: Money, amount: Money, parameter: &'static str, month: u32) -> Result<Money> {
    total.checked_add(amount).ok_or_else(|| overflow(parameter, month))
}

fn overflow(parameter: &'static str, month: u32) -> AmortizationError {
    AmortizationError::NumericOverflow {
        parameter,
        message: format!("running total not representable in month {}", month),
    }
}

/// simulate the full schedule for one set of parameters
pub fn simulate(params: &LoanParameters) -> Result<SimulationResult> {
    AmortizationCalculator::new(params).run()
}
