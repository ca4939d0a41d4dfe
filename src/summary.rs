//! presentation-ready figures for charting collaborators

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::comparison::ScenarioComparison;
use crate::decimal::{Money, Rate};
use crate::errors::Result;
use crate::events::Event;
use crate::payments::{RemainingTotals, SimulationResult};
use crate::types::{PayoffStatus, YearMonth};

/// installment in force from a given month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InstallmentChange {
    pub month: u32,
    pub payment: Money,
}

/// everything needed to caption a schedule chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub payments: u32,
    pub years: u32,
    pub months: u32,
    pub loan_amount: Money,
    pub initial_rate: Rate,
    pub final_rate: Rate,
    pub installments: Vec<InstallmentChange>,
    pub monthly_fees: Money,
    pub total_fees: Money,
    pub total_interest: Money,
    pub total_principal: Money,
    pub total_penalties: Money,
    pub status: PayoffStatus,
    pub end_date: Option<YearMonth>,
    pub remaining_after_reference: Option<RemainingTotals>,
}

impl ScheduleSummary {
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for ScheduleSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} payments ({}y, {}m)", self.payments, self.years, self.months)?;
        write!(
            f,
            "* loan amount: {:.2}, yearly interest rate: {:.4}",
            self.loan_amount, self.initial_rate
        )?;
        if self.final_rate != self.initial_rate {
            write!(f, " -> {:.4}", self.final_rate)?;
        }
        writeln!(f)?;

        for change in &self.installments {
            write!(
                f,
                "* monthly payment: {:.2} + {:.2} fee = {:.2}",
                change.payment,
                self.monthly_fees,
                change.payment + self.monthly_fees
            )?;
            if change.month > 1 {
                write!(f, " [from month {}]", change.month)?;
            }
            writeln!(f)?;
        }

        writeln!(f, "* total fees: {:.2}", self.total_fees)?;
        writeln!(f, "* total interest:  {:.2}", self.total_interest)?;
        write!(f, "* total principal: {:.2}", self.total_principal)?;

        if self.total_penalties.is_positive() {
            write!(f, "\n* total prepayment penalties: {:.2}", self.total_penalties)?;
        }
        if let PayoffStatus::TermExhausted { outstanding } = self.status {
            write!(f, "\n* outstanding at end of term: {:.2}", outstanding)?;
        }
        if let Some(end) = self.end_date {
            write!(f, "\n* last payment: {}", end)?;
        }
        if let Some(remaining) = &self.remaining_after_reference {
            write!(
                f,
                "\n* after {}: {} payments, interest {:.2}, principal {:.2}",
                remaining.reference_date, remaining.payments, remaining.interest, remaining.principal
            )?;
        }
        Ok(())
    }
}

/// one point of the cumulative interest / principal curves
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub month: u32,
    pub cumulative_interest: Money,
    pub cumulative_principal: Money,
}

impl SimulationResult {
    pub fn summary(&self) -> ScheduleSummary {
        let payments = self.months_paid();
        let installments = self
            .events
            .iter()
            .filter_map(|event| match event {
                Event::PaymentCalculated { month, payment, .. } => Some(InstallmentChange {
                    month: *month,
                    payment: *payment,
                }),
                _ => None,
            })
            .collect();

        ScheduleSummary {
            payments,
            years: payments / 12,
            months: payments % 12,
            loan_amount: self.loan_amount,
            initial_rate: self.annual_interest_rate,
            final_rate: self
                .entries
                .last()
                .map(|e| e.annual_rate)
                .unwrap_or(self.annual_interest_rate),
            installments,
            monthly_fees: self.monthly_fees,
            total_fees: self.total_fees,
            total_interest: self.total_interest,
            total_principal: self.total_principal,
            total_penalties: self.total_penalties,
            status: self.status,
            end_date: self.end_date,
            remaining_after_reference: self.remaining_after_reference,
        }
    }

    pub fn chart_points(&self) -> Vec<ChartPoint> {
        self.entries
            .iter()
            .map(|e| ChartPoint {
                month: e.month,
                cumulative_interest: e.cumulative_interest,
                cumulative_principal: e.cumulative_principal,
            })
            .collect()
    }
}

/// figures behind the interest comparison bar chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub loan_amount: Money,
    pub baseline_interest: Money,
    pub with_extra_interest: Money,
    pub interest_saved: Money,
    pub months_saved: u32,
}

impl ComparisonSummary {
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for ComparisonSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Difference in interest: {:.2}", self.interest_saved)
    }
}

impl ScenarioComparison {
    pub fn summary(&self) -> ComparisonSummary {
        ComparisonSummary {
            loan_amount: self.baseline.loan_amount,
            baseline_interest: self.baseline.total_interest,
            with_extra_interest: self.with_extra.total_interest,
            interest_saved: self.interest_saved,
            months_saved: self.months_saved(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::compare_with_extra_payments;
    use crate::config::LoanParameters;
    use crate::payments::simulate;
    use crate::types::{ExtraPaymentSpec, RateChange};
    use rust_decimal_macros::dec;

    fn mortgage() -> LoanParameters {
        LoanParameters::new(Money::from_major(100_000), 300, Rate::from_decimal(dec!(0.052)))
    }

    #[test]
    fn test_summary_caption() {
        let mut params = mortgage();
        params.monthly_fees = Money::from_major(10);
        let summary = simulate(&params).unwrap().summary();

        assert_eq!(summary.payments, 300);
        assert_eq!((summary.years, summary.months), (25, 0));
        assert_eq!(summary.installments.len(), 1);

        let text = summary.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "300 payments (25y, 0m)");
        assert_eq!(lines[1], "* loan amount: 100000.00, yearly interest rate: 5.2000%");
        assert_eq!(lines[2], "* monthly payment: 596.30 + 10.00 fee = 606.30");
        assert_eq!(lines[3], "* total fees: 3000.00");
        assert!(lines[4].starts_with("* total interest:  78890.4"));
        assert_eq!(lines[5], "* total principal: 100000.00");
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn test_summary_lists_installment_changes() {
        let mut params = mortgage();
        params.annual_interest_rate = Rate::from_bps(488);
        params.rate_changes = vec![RateChange::new(120, Rate::from_bps(447))];
        params.recalculate_on_rate_change = true;
        let summary = simulate(&params).unwrap().summary();

        assert_eq!(summary.final_rate, Rate::from_bps(447));
        assert_eq!(summary.installments.len(), 2);
        assert_eq!(summary.installments[1].month, 120);

        let text = summary.to_string();
        assert!(text.contains("yearly interest rate: 4.8800% -> 4.4700%"));
        assert!(text.contains("[from month 120]"));
    }

    #[test]
    fn test_summary_dates() {
        let mut params = mortgage();
        params.start_date = Some(YearMonth::new(2021, 11).unwrap());
        params.reference_date = Some(YearMonth::new(2025, 6).unwrap());
        let summary = simulate(&params).unwrap().summary();

        let text = summary.to_string();
        assert!(text.contains("* last payment: 2046-10"));
        assert!(text.contains("* after 2025-06: 256 payments"));
    }

    #[test]
    fn test_chart_points_follow_entries() {
        let result = simulate(&mortgage()).unwrap();
        let points = result.chart_points();

        assert_eq!(points.len(), 300);
        assert_eq!(points[0].month, 1);
        assert_eq!(points[299].cumulative_principal, Money::from_major(100_000));
        assert!(points.windows(2).all(|w| w[0].cumulative_interest <= w[1].cumulative_interest));
    }

    #[test]
    fn test_comparison_summary() {
        let mut params = mortgage();
        params.extra_payments = ExtraPaymentSpec::Constant(Money::from_major(1_000));
        let comparison = compare_with_extra_payments(&params).unwrap();
        let summary = comparison.summary();

        assert_eq!(summary.loan_amount, Money::from_major(100_000));
        assert_eq!(summary.months_saved, 226);
        assert_eq!(summary.interest_saved, comparison.interest_saved);
        assert!(summary.to_string().starts_with("Difference in interest: 618"));

        let json = summary.to_json_pretty().unwrap();
        assert!(json.contains("\"months_saved\": 226"));
    }
}
