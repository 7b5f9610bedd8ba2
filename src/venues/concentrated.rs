use super::pool::{Pool, QuoteError, sqrt_u256, zero_for_one};
use super::venue::Venue;
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

const FEE_DENOMINATOR: u32 = 1_000_000;

/// Concentrated-liquidity pool modelled as a single active range.
///
/// `sqrt_price_x96` is sqrt(token1/token0) in Q64.96. Swaps never cross a
/// tick boundary, so the range behaves like constant product over the
/// virtual reserves `L / sqrtP` and `L * sqrtP`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConcentratedLiquidityPool {
    pub venue: Venue,
    pub token0: Address,
    pub token1: Address,
    pub fee_tier: u32,
    pub sqrt_price_x96: U256,
    pub liquidity: U256,
    #[serde(default)]
    pub paused: bool,
}

impl ConcentratedLiquidityPool {
    pub fn new(token0: Address, token1: Address, fee_tier: u32, sqrt_price_x96: U256, liquidity: U256) -> Self {
        Self { venue: Venue::UniswapV3, token0, token1, fee_tier, sqrt_price_x96, liquidity, paused: false }
    }

    /// Build a pool whose virtual reserves match `reserve0` / `reserve1`.
    pub fn from_reserves(token0: Address, token1: Address, fee_tier: u32, reserve0: U256, reserve1: U256) -> Self {
        let liquidity = sqrt_u256(reserve0.saturating_mul(reserve1));
        let sqrt_price_x96 = if reserve0.is_zero() {
            U256::ZERO
        } else {
            sqrt_u256((reserve1 << 96) / reserve0) << 48
        };
        Self::new(token0, token1, fee_tier, sqrt_price_x96, liquidity)
    }

    pub fn virtual_reserve0(&self) -> U256 {
        if self.sqrt_price_x96.is_zero() { U256::ZERO } else { (self.liquidity << 96) / self.sqrt_price_x96 }
    }

    pub fn virtual_reserve1(&self) -> U256 {
        self.liquidity.saturating_mul(self.sqrt_price_x96) >> 96
    }

    // Returns (amount_out, next_sqrt_price_x96).
    fn compute_swap(&self, zero_for_one: bool, amount_in: U256) -> Result<(U256, U256), QuoteError> {
        if self.paused {
            return Err(QuoteError::Paused);
        }
        if self.liquidity.is_zero() || self.sqrt_price_x96.is_zero() {
            return Err(QuoteError::InsufficientLiquidity);
        }
        let fee_multiplier = U256::from(FEE_DENOMINATOR.saturating_sub(self.fee_tier));
        let amount_in_less_fee =
            amount_in.checked_mul(fee_multiplier).ok_or(QuoteError::Overflow)? / U256::from(FEE_DENOMINATOR);
        // virtual_reserve0 rounds to zero for prices above L in Q96, so the
        // zero-for-one denominator is only non-zero with some input left
        if amount_in_less_fee.is_zero() {
            return Err(QuoteError::ZeroOutput);
        }
        let liquidity_x96 = self.liquidity.checked_shl(96).ok_or(QuoteError::Overflow)?;

        let (amount_out, next_sqrt_price) = if zero_for_one {
            let denominator = self.virtual_reserve0().checked_add(amount_in_less_fee).ok_or(QuoteError::Overflow)?;
            let next = liquidity_x96 / denominator;
            let delta = self.sqrt_price_x96.saturating_sub(next);
            (self.liquidity.checked_mul(delta).ok_or(QuoteError::Overflow)? >> 96, next)
        } else {
            let step = amount_in_less_fee.checked_shl(96).ok_or(QuoteError::Overflow)? / self.liquidity;
            let next = self.sqrt_price_x96.checked_add(step).ok_or(QuoteError::Overflow)?;
            (self.virtual_reserve0().saturating_sub(liquidity_x96 / next), next)
        };

        if amount_out.is_zero() {
            return Err(QuoteError::ZeroOutput);
        }
        Ok((amount_out, next_sqrt_price))
    }
}

#[typetag::serde]
impl Pool for ConcentratedLiquidityPool {
    fn get_venue(&self) -> Venue {
        self.venue
    }

    fn get_fee_tier(&self) -> Option<u32> {
        Some(self.fee_tier)
    }

    fn get_tokens(&self) -> (Address, Address) {
        (self.token0, self.token1)
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    fn calculate_out_amount(&self, token_in: Address, token_out: Address, amount_in: U256) -> Result<U256, QuoteError> {
        let direction = zero_for_one(self.get_tokens(), token_in, token_out)?;
        self.compute_swap(direction, amount_in).map(|(amount_out, _)| amount_out)
    }

    fn apply_swap(&mut self, token_in: Address, token_out: Address, amount_in: U256) -> Result<U256, QuoteError> {
        let direction = zero_for_one(self.get_tokens(), token_in, token_out)?;
        let (amount_out, next_sqrt_price) = self.compute_swap(direction, amount_in)?;
        self.sqrt_price_x96 = next_sqrt_price;
        Ok(amount_out)
    }

    fn clone_box(&self) -> Box<dyn Pool> {
        Box::new(self.clone())
    }
}
