use super::pool::{Pool, QuoteError, u256_to_f64, zero_for_one};
use super::venue::Venue;
use crate::utils::constants::BPS_DENOMINATOR;
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

const ONE_E18: u128 = 1_000_000_000_000_000_000;

fn default_swap_fee_bps() -> u32 {
    25
}

/// Two-token weighted pool (Balancer style).
///
/// out = B_out * (1 - (B_in / (B_in + A_in)) ^ (w_in / w_out))
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WeightedPool {
    pub venue: Venue,
    pub token0: Address,
    pub token1: Address,
    pub balance0: U256,
    pub balance1: U256,
    pub weight0: u32,
    pub weight1: u32,
    #[serde(default = "default_swap_fee_bps")]
    pub swap_fee_bps: u32,
    #[serde(default)]
    pub paused: bool,
}

impl WeightedPool {
    pub fn new(token0: Address, token1: Address, balance0: U256, balance1: U256, weight0: u32, weight1: u32) -> Self {
        Self {
            venue: Venue::Balancer,
            token0,
            token1,
            balance0,
            balance1,
            weight0,
            weight1,
            swap_fee_bps: default_swap_fee_bps(),
            paused: false,
        }
    }

    pub fn with_swap_fee_bps(mut self, swap_fee_bps: u32) -> Self {
        self.swap_fee_bps = swap_fee_bps;
        self
    }

    fn sides(&self, zero_for_one: bool) -> (U256, U256, u32, u32) {
        if zero_for_one {
            (self.balance0, self.balance1, self.weight0, self.weight1)
        } else {
            (self.balance1, self.balance0, self.weight1, self.weight0)
        }
    }

    fn out_amount(&self, zero_for_one: bool, amount_in: U256) -> Result<U256, QuoteError> {
        if self.paused {
            return Err(QuoteError::Paused);
        }
        let (balance_in, balance_out, weight_in, weight_out) = self.sides(zero_for_one);
        if balance_in.is_zero() || balance_out.is_zero() || weight_in == 0 || weight_out == 0 {
            return Err(QuoteError::InsufficientLiquidity);
        }
        let fee_multiplier = U256::from(BPS_DENOMINATOR.saturating_sub(self.swap_fee_bps));
        let amount_in_less_fee =
            amount_in.checked_mul(fee_multiplier).ok_or(QuoteError::Overflow)? / U256::from(BPS_DENOMINATOR);
        let new_balance_in = balance_in.checked_add(amount_in_less_fee).ok_or(QuoteError::Overflow)?;

        let amount_out = if weight_in == weight_out {
            // equal weights reduce to constant product; keep it exact
            balance_out.checked_mul(amount_in_less_fee).ok_or(QuoteError::Overflow)? / new_balance_in
        } else {
            let ratio = u256_to_f64(balance_in) / u256_to_f64(new_balance_in);
            let exponent = weight_in as f64 / weight_out as f64;
            let factor = 1.0 - ratio.powf(exponent);
            if !factor.is_finite() || factor <= 0.0 {
                return Err(QuoteError::ZeroOutput);
            }
            let scaled = U256::from((factor * ONE_E18 as f64) as u128);
            balance_out.checked_mul(scaled).ok_or(QuoteError::Overflow)? / U256::from(ONE_E18)
        };

        if amount_out.is_zero() {
            return Err(QuoteError::ZeroOutput);
        }
        if amount_out >= balance_out {
            return Err(QuoteError::InsufficientLiquidity);
        }
        Ok(amount_out)
    }
}

#[typetag::serde]
impl Pool for WeightedPool {
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
        self.out_amount(direction, amount_in)
    }

    fn apply_swap(&mut self, token_in: Address, token_out: Address, amount_in: U256) -> Result<U256, QuoteError> {
        let direction = zero_for_one(self.get_tokens(), token_in, token_out)?;
        let amount_out = self.out_amount(direction, amount_in)?;
        if direction {
            self.balance0 = self.balance0.checked_add(amount_in).ok_or(QuoteError::Overflow)?;
            self.balance1 -= amount_out;
        } else {
            self.balance1 = self.balance1.checked_add(amount_in).ok_or(QuoteError::Overflow)?;
            self.balance0 -= amount_out;
        }
        Ok(amount_out)
    }

    fn clone_box(&self) -> Box<dyn Pool> {
        Box::new(self.clone())
    }
}
