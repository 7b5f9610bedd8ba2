/// Execution Layer
///
/// This layer is responsible for:
/// - Re-validating a chosen route before it runs
/// - Rate limiting borrowed-capital executions per caller
/// - Borrowing and repaying flash capital
/// - Running the leg sequence as one all-or-nothing unit of work
pub mod execution_engine;
pub mod flash_lender;
pub mod rate_limiter;
pub mod request;
pub mod unit_of_work;

pub use execution_engine::ExecutionEngine;
pub use flash_lender::{FlashLender, FlashLoan};
pub use rate_limiter::{AccountPolicyState, DEFAULT_COOLDOWN_SECS, DEFAULT_DAILY_LIMIT, PolicyLimits, PolicySnapshot, RateLimiter};
pub use request::{ArbitrageExecutionRequest, ExecutionReceipt};
pub use unit_of_work::UnitOfWork;
