use crate::decimal::{Money, Rate};
use crate::errors::{AmortizationError, Result};
use crate::types::RateChange;

/// annual rate in force for each month of a schedule
#[derive(Debug, Clone, PartialEq)]
pub struct RateSchedule {
    base_rate: Rate,
    changes: Vec<RateChange>,
}

impl RateSchedule {
    /// `changes` must be sorted by month, which parameter validation guarantees
    pub fn new(base_rate: Rate, changes: &[RateChange]) -> Self {
        Self {
            base_rate,
            changes: changes.to_vec(),
        }
    }

    pub fn base_rate(&self) -> Rate {
        self.base_rate
    }

    /// annual rate charged in the 1-based month
    pub fn rate_for_month(&self, month: u32) -> Rate {
        self.changes
            .iter()
            .take_while(|c| c.effective_from_month <= month)
            .last()
            .map(|c| c.annual_rate)
            .unwrap_or(self.base_rate)
    }

    /// breakpoint that fires exactly at the 1-based month
    pub fn change_at(&self, month: u32) -> Option<&RateChange> {
        self.changes.iter().find(|c| c.effective_from_month == month)
    }

    /// interest for one month on the balance at the rate in force
    pub fn interest_for_month(&self, balance: Money, month: u32) -> Result<Money> {
        let rate = self.rate_for_month(month);
        balance
            .monthly_interest(rate)
            .ok_or_else(|| AmortizationError::NumericOverflow {
                parameter: "annual_interest_rate",
                message: format!("interest on {} at {} in month {}", balance, rate, month),
            })
    }
}
