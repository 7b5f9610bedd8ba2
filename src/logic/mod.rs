/// Logic Layer - Opportunity Search
///
/// This layer is responsible for:
/// - Enumerating two-leg and triangle routes over the venue set
/// - Profit and cost arithmetic shared with execution
/// - Bounding search work by a caller budget
/// - Identifying routes by a stable hash
pub mod budget;
pub mod profit;
pub mod route_hash;
pub mod search_engine;
pub mod types;

pub use budget::WorkBudget;
pub use profit::{CostModel, apply_slippage, flash_premium, mul_bps};
pub use route_hash::{RouteHash, generate_route_hash};
pub use search_engine::{OpportunitySearchEngine, SearchParams};
pub use types::{ArbitrageOpportunity, SearchConfig, SearchReport, TokenPair};
