use super::pool::{Pool, QuoteError, zero_for_one};
use super::venue::Venue;
use crate::utils::constants::BPS_DENOMINATOR;
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

fn default_fee_bps() -> u32 {
    30
}

/// x * y = k pool (UniswapV2 and its forks).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConstantProductPool {
    pub venue: Venue,
    pub token0: Address,
    pub token1: Address,
    pub reserve0: U256,
    pub reserve1: U256,
    #[serde(default = "default_fee_bps")]
    pub fee_bps: u32,
    #[serde(default)]
    pub paused: bool,
}

impl ConstantProductPool {
    pub fn new(venue: Venue, token0: Address, token1: Address, reserve0: U256, reserve1: U256) -> Self {
        Self { venue, token0, token1, reserve0, reserve1, fee_bps: default_fee_bps(), paused: false }
    }

    pub fn with_fee_bps(mut self, fee_bps: u32) -> Self {
        self.fee_bps = fee_bps;
        self
    }

    fn reserves_for(&self, zero_for_one: bool) -> (U256, U256) {
        if zero_for_one { (self.reserve0, self.reserve1) } else { (self.reserve1, self.reserve0) }
    }

    fn out_amount(&self, reserve_in: U256, reserve_out: U256, amount_in: U256) -> Result<U256, QuoteError> {
        if self.paused {
            return Err(QuoteError::Paused);
        }
        if reserve_in.is_zero() || reserve_out.is_zero() {
            return Err(QuoteError::InsufficientLiquidity);
        }
        let fee_multiplier = U256::from(BPS_DENOMINATOR.saturating_sub(self.fee_bps));
        let amount_in_with_fee = amount_in.checked_mul(fee_multiplier).ok_or(QuoteError::Overflow)?;
        let numerator = amount_in_with_fee.checked_mul(reserve_out).ok_or(QuoteError::Overflow)?;
        let denominator = reserve_in
            .checked_mul(U256::from(BPS_DENOMINATOR))
            .and_then(|scaled| scaled.checked_add(amount_in_with_fee))
            .ok_or(QuoteError::Overflow)?;

        let amount_out = numerator / denominator;
        if amount_out.is_zero() {
            return Err(QuoteError::ZeroOutput);
        }
        Ok(amount_out)
    }
}

#[typetag::serde]
impl Pool for ConstantProductPool {
    fn get_venue(&self) -> Venue {
        self.venue
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
        let (reserve_in, reserve_out) = self.reserves_for(direction);
        self.out_amount(reserve_in, reserve_out, amount_in)
    }

    fn apply_swap(&mut self, token_in: Address, token_out: Address, amount_in: U256) -> Result<U256, QuoteError> {
        let direction = zero_for_one(self.get_tokens(), token_in, token_out)?;
        let (reserve_in, reserve_out) = self.reserves_for(direction);
        let amount_out = self.out_amount(reserve_in, reserve_out, amount_in)?;
        let new_in = reserve_in.checked_add(amount_in).ok_or(QuoteError::Overflow)?;
        let new_out = reserve_out - amount_out;
        if direction {
            self.reserve0 = new_in;
            self.reserve1 = new_out;
        } else {
            self.reserve1 = new_in;
            self.reserve0 = new_out;
        }
        Ok(amount_out)
    }

    fn clone_box(&self) -> Box<dyn Pool> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> ConstantProductPool {
        ConstantProductPool::new(
            Venue::UniswapV2,
            Address::repeat_byte(1),
            Address::repeat_byte(2),
            U256::from(1_000_000u64),
            U256::from(2_000_000u64),
        )
    }

    #[test]
    fn test_out_amount_with_fee() -> eyre::Result<()> {
        let pool = pool();
        // 1000 * 9970 * 2_000_000 / (1_000_000 * 10000 + 1000 * 9970)
        let out = pool.calculate_out_amount(Address::repeat_byte(1), Address::repeat_byte(2), U256::from(1000))?;
        assert_eq!(out, U256::from(1992u64));

        let zero_fee = pool.clone().with_fee_bps(0);
        let out = zero_fee.calculate_out_amount(Address::repeat_byte(2), Address::repeat_byte(1), U256::from(2000))?;
        assert_eq!(out, U256::from(999u64));
        Ok(())
    }

    #[test]
    fn test_apply_swap_moves_reserves() -> eyre::Result<()> {
        let mut pool = pool();
        let quoted = pool.calculate_out_amount(Address::repeat_byte(1), Address::repeat_byte(2), U256::from(1000))?;
        let out = pool.apply_swap(Address::repeat_byte(1), Address::repeat_byte(2), U256::from(1000))?;
        assert_eq!(quoted, out);
        assert_eq!(pool.reserve0, U256::from(1_001_000u64));
        assert_eq!(pool.reserve1, U256::from(2_000_000u64) - out);
        Ok(())
    }

    #[test]
    fn test_paused_pool_is_unavailable() {
        let mut pool = pool();
        pool.set_paused(true);
        let result = pool.calculate_out_amount(Address::repeat_byte(1), Address::repeat_byte(2), U256::from(1000));
        assert_eq!(result, Err(QuoteError::Paused));
    }

    #[test]
    fn test_serialize_tagged() -> eyre::Result<()> {
        let boxed: Box<dyn Pool> = Box::new(pool());
        let json = serde_json::to_string(&boxed)?;
        assert!(json.starts_with("{\"type\":\"ConstantProductPool\""));
        let back: Box<dyn Pool> = serde_json::from_str(&json)?;
        assert_eq!(back.get_venue(), Venue::UniswapV2);
        Ok(())
    }
}
