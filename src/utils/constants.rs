use alloy_primitives::{Address, address};

pub const WETH: Address = address!("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");

/// Basis-point denominator (100% = 10_000 bps).
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Length of the rolling window the daily borrow limit is counted over.
pub const ROLLING_DAY_SECS: u64 = 86_400;

#[non_exhaustive]
pub struct MainnetToken;

impl MainnetToken {
    pub const WETH: Address = WETH;
    pub const USDC: Address = address!("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");
    pub const USDT: Address = address!("0xdAC17F958D2ee523a2206206994597C13D831ec7");
    pub const DAI: Address = address!("0x6B175474E89094C44Da98b954EedeAC495271d0F");
    pub const WBTC: Address = address!("0x2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599");

    // extended universe
    pub const LINK: Address = address!("0x514910771AF9Ca656af840dff83E8264EcF986CA");
    pub const UNI: Address = address!("0x1f9840a85d5aF5bf1D1762F925BDADdC4201F984");
    pub const AAVE: Address = address!("0x7Fc66500c84A76Ad7e9c93437bFc5Ac33E2DDaE9");
}
