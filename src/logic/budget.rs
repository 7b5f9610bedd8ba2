use crate::errors::{ArbError, ArbResult};

/// Bounded work allowance for the enumeration. One unit is one venue quote.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkBudget {
    limit: Option<u64>,
    used: u64,
}

impl WorkBudget {
    pub fn unlimited() -> Self {
        Self { limit: None, used: 0 }
    }

    pub fn limited(limit: u64) -> Self {
        Self { limit: Some(limit), used: 0 }
    }

    /// Budget derived from a caller gas limit, `quote_gas_cost` gas per quote.
    pub fn from_gas_limit(gas_limit: u64, quote_gas_cost: u64) -> Self {
        Self::limited(gas_limit / quote_gas_cost.max(1))
    }

    /// Reserve `units` of work. Fails without consuming anything once the
    /// limit would be crossed.
    pub fn charge(&mut self, units: u64) -> ArbResult<()> {
        let next = self.used.saturating_add(units);
        if let Some(limit) = self.limit {
            if next > limit {
                return Err(ArbError::WorkBudgetExceeded { used: self.used });
            }
        }
        self.used = next;
        Ok(())
    }

    pub fn used(&self) -> u64 {
        self.used
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn remaining(&self) -> Option<u64> {
        self.limit.map(|limit| limit.saturating_sub(self.used))
    }
}

impl Default for WorkBudget {
    fn default() -> Self {
        Self::unlimited()
    }
}
