use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};

/// notable points in a simulated schedule, in the order they happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// fixed installment set or recalculated, effective from `month`
    PaymentCalculated {
        month: u32,
        payment: Money,
        reason: PaymentReason,
    },
    InterestRateChanged {
        month: u32,
        old_rate: Rate,
        new_rate: Rate,
    },
    ExtraPaymentApplied {
        month: u32,
        requested: Money,
        applied: Money,
        penalty: Money,
    },
    LoanPaidOff {
        month: u32,
    },
    TermExhausted {
        outstanding: Money,
    },
}

/// why the installment was (re)computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentReason {
    Origination,
    RateChange,
    ExtraPayment,
}

/// event store for collecting events during a simulation run
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }
}
