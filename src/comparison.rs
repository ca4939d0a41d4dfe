use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::LoanParameters;
use crate::decimal::Money;
use crate::errors::{AmortizationError, Result};
use crate::payments::{simulate, SimulationResult};

/// baseline schedule next to the same loan with extra payments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub baseline: SimulationResult,
    pub with_extra: SimulationResult,
    /// baseline interest minus interest with extra payments
    pub interest_saved: Money,
}

impl ScenarioComparison {
    pub fn months_saved(&self) -> u32 {
        self.baseline
            .months_paid()
            .saturating_sub(self.with_extra.months_paid())
    }

    pub fn fees_saved(&self) -> Money {
        self.baseline.total_fees - self.with_extra.total_fees
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// run the loan with and without its extra payments
pub fn compare_with_extra_payments(params: &LoanParameters) -> Result<ScenarioComparison> {
    params.validate()?;
    if !params.has_extra_payments() {
        return Err(AmortizationError::ExtraPaymentsNotConfigured);
    }

    let baseline = simulate(&params.without_extra_payments())?;
    let with_extra = simulate(params)?;
    let interest_saved = baseline.total_interest - with_extra.total_interest;

    debug!(
        "extra payments save {:.2} interest over {} months",
        interest_saved,
        baseline.months_paid().saturating_sub(with_extra.months_paid())
    );

    Ok(ScenarioComparison {
        baseline,
        with_extra,
        interest_saved,
    })
}

/// baseline always, comparison only when extra payments are configured
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioPlan {
    pub baseline: SimulationResult,
    pub comparison: Option<ScenarioComparison>,
}

impl ScenarioPlan {
    /// every schedule produced, baseline first
    pub fn schedules(&self) -> Vec<&SimulationResult> {
        let mut schedules = vec![&self.baseline];
        if let Some(comparison) = &self.comparison {
            schedules.push(&comparison.with_extra);
        }
        schedules
    }
}

pub fn plan(params: &LoanParameters) -> Result<ScenarioPlan> {
    if params.has_extra_payments() {
        let comparison = compare_with_extra_payments(params)?;
        Ok(ScenarioPlan {
            baseline: comparison.baseline.clone(),
            comparison: Some(comparison),
        })
    } else {
        Ok(ScenarioPlan {
            baseline: simulate(params)?,
            comparison: None,
        })
    }
}
