pub mod amortization;
pub mod annuity;
pub mod overpayment;

pub use amortization::{
    simulate, AmortizationCalculator, RemainingTotals, ScheduleEntry, SimulationResult,
};
pub use annuity::compute_payment;
pub use overpayment::{OverpaymentHandler, OverpaymentResult};
