// Three-Layer Architecture
pub mod venues; // Venue Layer: Pool math, quoting and swaps per venue
pub mod logic; // Logic Layer: Opportunity search, profit arithmetic
pub mod execution; // Execution Layer: Rate limiting, flash capital, atomic execution

// Engine state and the external interface
pub mod access;
pub mod bot;
pub mod config;
pub mod errors;
pub mod state;

// Common utilities and types
pub mod utils;

#[cfg(test)]
mod tests;

// Re-export key components from each layer
pub use access::{AccessGuard, AccessLevel, CallContext};
pub use bot::{ArbitrageBot, AutoExecuteOutcome, EngineStatus};
pub use config::EngineConfigSection;
pub use errors::{ArbError, ArbResult};
pub use execution::{ArbitrageExecutionRequest, ExecutionReceipt, FlashLender, PolicyLimits, PolicySnapshot, RateLimiter};
pub use logic::{ArbitrageOpportunity, OpportunitySearchEngine, RouteHash, SearchConfig, SearchReport, TokenPair, WorkBudget};
pub use state::{ConfigSetting, ContractConfig, ContractStats, EngineEvent, StateLedger};
pub use utils::Token;
pub use venues::{Pool, QuoteError, Venue, VenueBackend, VenueBook, VenueQuoteAdapter, VenueSelection};
