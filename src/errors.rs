use crate::venues::{QuoteError, Venue};
use alloy_primitives::{Address, U256};

/// Every fault the engine can surface to a caller.
///
/// Execution-phase variants always mean the whole unit was rolled back:
/// no balance, venue state, stats or policy counter changed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArbError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Not operator: {0}")]
    NotOperator(Address),
    #[error("Invalid operator: {0}")]
    InvalidOperator(Address),
    #[error("Paused")]
    Paused,
    #[error("Cooldown active: {remaining_secs}s remaining")]
    CooldownActive { remaining_secs: u64 },
    #[error("Daily limit exceeded: {used}/{limit} borrowed executions in the last 24h")]
    DailyLimitExceeded { used: u32, limit: u32 },
    #[error("Deadline expired: deadline {deadline}, now {now}")]
    DeadlineExpired { deadline: u64, now: u64 },
    #[error("Invalid route: {0}")]
    InvalidRoute(String),
    #[error("Slippage exceeded on leg {leg}: got {amount_out}, min {min_out}")]
    SlippageExceeded { leg: usize, amount_out: U256, min_out: U256 },
    #[error("Insufficient realized profit: realized {realized}, required {required}")]
    InsufficientRealizedProfit { realized: U256, required: U256 },
    #[error("Loan repayment failed: owed {owed}, available {available}")]
    LoanRepaymentFailed { owed: U256, available: U256 },
    #[error("Flash loan unavailable: requested {requested}, lender liquidity {available}")]
    FlashLoanUnavailable { requested: U256, available: U256 },
    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: U256, available: U256 },
    #[error("Venue unavailable on leg {leg} ({venue}): {source}")]
    VenueUnavailable {
        leg: usize,
        venue: Venue,
        #[source]
        source: QuoteError,
    },
    #[error("Work budget exceeded after {used} units")]
    WorkBudgetExceeded { used: u64 },
}

pub type ArbResult<T> = Result<T, ArbError>;
