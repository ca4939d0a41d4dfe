use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::decimal::{Money, Rate};
use crate::errors::{AmortizationError, Result};

/// extra principal payments on top of the fixed installment
///
/// a bare number in json is a constant monthly amount, an array is a per-month schedule
/// where index `i` is applied in month `i + 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtraPaymentSpec {
    /// same amount every month
    Constant(Money),
    /// per-month amounts, months past the end receive nothing
    Schedule(Vec<Money>),
}

impl Default for ExtraPaymentSpec {
    fn default() -> Self {
        ExtraPaymentSpec::Constant(Money::ZERO)
    }
}

impl ExtraPaymentSpec {
    /// no extra payments at all
    pub fn none() -> Self {
        Self::default()
    }

    /// amount requested for the zero-based month index
    pub fn amount_for_month(&self, month_index: u32) -> Money {
        match self {
            ExtraPaymentSpec::Constant(amount) => *amount,
            ExtraPaymentSpec::Schedule(amounts) => amounts
                .get(month_index as usize)
                .copied()
                .unwrap_or(Money::ZERO),
        }
    }

    /// a non-zero constant or a non-empty schedule
    pub fn is_configured(&self) -> bool {
        match self {
            ExtraPaymentSpec::Constant(amount) => !amount.is_zero(),
            ExtraPaymentSpec::Schedule(amounts) => !amounts.is_empty(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            ExtraPaymentSpec::Constant(amount) if amount.is_negative() => {
                Err(AmortizationError::InvalidExtraPayment { month: 1, amount: *amount })
            }
            ExtraPaymentSpec::Constant(_) => Ok(()),
            ExtraPaymentSpec::Schedule(amounts) => {
                match amounts.iter().position(|a| a.is_negative()) {
                    Some(index) => Err(AmortizationError::InvalidExtraPayment {
                        month: index as u32 + 1,
                        amount: amounts[index],
                    }),
                    None => Ok(()),
                }
            }
        }
    }
}

impl From<Money> for ExtraPaymentSpec {
    fn from(amount: Money) -> Self {
        ExtraPaymentSpec::Constant(amount)
    }
}

impl From<Vec<Money>> for ExtraPaymentSpec {
    fn from(amounts: Vec<Money>) -> Self {
        ExtraPaymentSpec::Schedule(amounts)
    }
}

/// what an extra payment does to the rest of the schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OverpaymentStrategy {
    /// keep the installment, finish earlier
    #[default]
    ReduceTerm,
    /// keep the payoff month, lower the installment
    ReduceEmi,
}

/// `true` is the `reduce_term_on_extra` flag
impl From<bool> for OverpaymentStrategy {
    fn from(reduce_term: bool) -> Self {
        if reduce_term {
            OverpaymentStrategy::ReduceTerm
        } else {
            OverpaymentStrategy::ReduceEmi
        }
    }
}

/// new annual rate applying from a given month onwards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateChange {
    /// 1-based month index of the first month charged at the new rate
    pub effective_from_month: u32,
    pub annual_rate: Rate,
}

impl RateChange {
    pub fn new(effective_from_month: u32, annual_rate: Rate) -> Self {
        Self {
            effective_from_month,
            annual_rate,
        }
    }
}

/// calendar month, the only date granularity the schedule uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        let ym = Self { year, month };
        ym.validate()?;
        Ok(ym)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=12).contains(&self.month) {
            return Err(AmortizationError::InvalidDate {
                message: format!("month {} out of range 1..=12", self.month),
            });
        }
        Ok(())
    }

    /// shift forward by whole months
    pub fn add_months(&self, months: u32) -> Self {
        let zero_based = self.year as i64 * 12 + (self.month as i64 - 1) + months as i64;
        Self {
            year: zero_based.div_euclid(12) as i32,
            month: zero_based.rem_euclid(12) as u32 + 1,
        }
    }

    /// first day of the month
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

impl From<NaiveDate> for YearMonth {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl From<DateTime<Utc>> for YearMonth {
    fn from(timestamp: DateTime<Utc>) -> Self {
        timestamp.date_naive().into()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// how a schedule ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayoffStatus {
    /// balance reached zero in the given 1-based month
    PaidOff { month: u32 },
    /// every scheduled month was used and a balance is still owed
    TermExhausted { outstanding: Money },
}

impl PayoffStatus {
    pub fn is_paid_off(&self) -> bool {
        matches!(self, PayoffStatus::PaidOff { .. })
    }
}
