use super::pool::{Pool, QuoteError, zero_for_one};
use super::venue::Venue;
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// Pool quoting a fixed rate per direction, with no price impact.
///
/// Used to seed deterministic venue states; a rate is `numerator / denominator`
/// units of output per unit of input.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FixedRatePool {
    pub venue: Venue,
    #[serde(default)]
    pub fee_tier: Option<u32>,
    pub token0: Address,
    pub token1: Address,
    pub rate_0_to_1: (U256, U256),
    pub rate_1_to_0: (U256, U256),
    #[serde(default)]
    pub paused: bool,
}

impl FixedRatePool {
    pub fn new(venue: Venue, token0: Address, token1: Address, rate_0_to_1: (u64, u64), rate_1_to_0: (u64, u64)) -> Self {
        Self {
            venue,
            fee_tier: None,
            token0,
            token1,
            rate_0_to_1: (U256::from(rate_0_to_1.0), U256::from(rate_0_to_1.1)),
            rate_1_to_0: (U256::from(rate_1_to_0.0), U256::from(rate_1_to_0.1)),
            paused: false,
        }
    }

    pub fn with_fee_tier(mut self, fee_tier: u32) -> Self {
        self.fee_tier = Some(fee_tier);
        self
    }

    fn out_amount(&self, zero_for_one: bool, amount_in: U256) -> Result<U256, QuoteError> {
        if self.paused {
            return Err(QuoteError::Paused);
        }
        let (numerator, denominator) = if zero_for_one { self.rate_0_to_1 } else { self.rate_1_to_0 };
        if denominator.is_zero() {
            return Err(QuoteError::InsufficientLiquidity);
        }
        let amount_out = amount_in.checked_mul(numerator).ok_or(QuoteError::Overflow)? / denominator;
        if amount_out.is_zero() {
            return Err(QuoteError::ZeroOutput);
        }
        Ok(amount_out)
    }
}

#[typetag::serde]
impl Pool for FixedRatePool {
    fn get_venue(&self) -> Venue {
        self.venue
    }

    fn get_fee_tier(&self) -> Option<u32> {
        self.fee_tier
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
        self.out_amount(direction, amount_in)
    }

    fn apply_swap(&mut self, token_in: Address, token_out: Address, amount_in: U256) -> Result<U256, QuoteError> {
        self.calculate_out_amount(token_in, token_out, amount_in)
    }

    fn clone_box(&self) -> Box<dyn Pool> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_rates_per_direction() -> eyre::Result<()> {
        let pool = FixedRatePool::new(Venue::Sushiswap, Address::repeat_byte(1), Address::repeat_byte(2), (1_050, 1), (102, 105_000));
        let out = pool.calculate_out_amount(Address::repeat_byte(1), Address::repeat_byte(2), U256::from(1_000u64))?;
        assert_eq!(out, U256::from(1_050_000u64));
        let back = pool.calculate_out_amount(Address::repeat_byte(2), Address::repeat_byte(1), out)?;
        assert_eq!(back, U256::from(1_020u64));
        Ok(())
    }
}
