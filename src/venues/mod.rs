/// Venue Layer
///
/// Uniform quoting and swap execution across heterogeneous pool types:
/// - constant-product pools (UniswapV2, Sushiswap)
/// - concentrated-liquidity pools with fee tiers (UniswapV3)
/// - weighted pools (Balancer)
/// - fixed-rate pools for seeding deterministic venue states
pub mod book;
pub mod concentrated;
pub mod constant_product;
pub mod fixed_rate;
pub mod pool;
pub mod venue;
pub mod weighted;

pub use book::{VenueBackend, VenueBook, VenueQuoteAdapter};
pub use concentrated::ConcentratedLiquidityPool;
pub use constant_product::ConstantProductPool;
pub use fixed_rate::FixedRatePool;
pub use pool::{Pool, PoolKey, QuoteError};
pub use venue::{CONCENTRATED_FEE_TIERS, Venue, VenueKind, VenueSelection};
pub use weighted::WeightedPool;
