//! Consecutive-failure budget for the poll loop.
//!
//! Transient fetch failures are tolerated; sustained inability to reach the
//! backend is fatal. A success resets the count to zero but never stops
//! polling by itself.

use tracing::warn;

/// Result of recording a failure against the budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetDecision {
    /// Still within budget; polling continues.
    Continue { failures: u8 },
    /// The consecutive-failure limit was reached; polling must stop.
    Exhausted { failures: u8 },
}

/// Counts consecutive failures against a fixed maximum.
#[derive(Debug, Clone)]
pub struct FailureBudget {
    failures: u8,
    max_failures: u8,
}

impl FailureBudget {
    pub fn new(max_failures: u8) -> Self {
        Self {
            failures: 0,
            max_failures,
        }
    }

    /// Record one failed attempt.
    pub fn record_failure(&mut self, error: &str) -> BudgetDecision {
        self.failures = self.failures.saturating_add(1);

        if self.failures >= self.max_failures {
            warn!(
                failures = self.failures,
                max = self.max_failures,
                error,
                "failure budget exhausted"
            );
            BudgetDecision::Exhausted {
                failures: self.failures,
            }
        } else {
            BudgetDecision::Continue {
                failures: self.failures,
            }
        }
    }

    /// Record a successful attempt, resetting the consecutive count.
    pub fn record_success(&mut self) {
        self.failures = 0;
    }

    pub fn failures(&self) -> u8 {
        self.failures
    }

    pub fn max_failures(&self) -> u8 {
        self.max_failures
    }
}
