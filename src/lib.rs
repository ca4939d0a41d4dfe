pub mod batch;
pub mod comparison;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod interest;
pub mod payments;
pub mod summary;
pub mod types;

// re-export key types
pub use batch::simulate_many;
pub use comparison::{compare_with_extra_payments, plan, ScenarioComparison, ScenarioPlan};
pub use config::{LoanParameters, LoanParametersBuilder, MAX_TERM_MONTHS};
pub use decimal::{Money, Rate};
pub use errors::{AmortizationError, Result};
pub use events::{Event, EventStore, PaymentReason};
pub use interest::RateSchedule;
pub use payments::{
    compute_payment, simulate, AmortizationCalculator, OverpaymentHandler, OverpaymentResult,
    RemainingTotals, ScheduleEntry, SimulationResult,
};
pub use summary::{ChartPoint, ComparisonSummary, InstallmentChange, ScheduleSummary};
pub use types::{ExtraPaymentSpec, OverpaymentStrategy, PayoffStatus, RateChange, YearMonth};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
