use crate::utils::constants::BPS_DENOMINATOR;
use alloy_primitives::U256;

/// `amount * bps / 10_000` rounded down. The product is never formed, so only
/// a result that itself exceeds U256 yields `None`.
pub fn mul_bps(amount: U256, bps: u32) -> Option<U256> {
    let denominator = U256::from(BPS_DENOMINATOR);
    let bps = U256::from(bps);
    let whole = (amount / denominator).checked_mul(bps)?;
    whole.checked_add(amount % denominator * bps / denominator)
}

/// Basis-point fee charged on borrowed principal, saturating.
pub fn flash_premium(amount: U256, premium_bps: u32) -> U256 {
    mul_bps(amount, premium_bps).unwrap_or(U256::MAX)
}

/// Quoted output reduced by the slippage tolerance.
pub fn apply_slippage(amount_out: U256, slippage_bps: u32) -> U256 {
    // kept share is at most 10_000 bps, the result never exceeds amount_out
    mul_bps(amount_out, BPS_DENOMINATOR.saturating_sub(slippage_bps)).unwrap_or(amount_out)
}

/// Execution cost model used by the search: gas at a fixed price plus the
/// flash premium on the full input. Costs that overflow are `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CostModel {
    pub gas_price: U256,
    pub flash_premium_bps: u32,
}

impl CostModel {
    pub fn new(gas_price: U256, flash_premium_bps: u32) -> Self {
        Self { gas_price, flash_premium_bps }
    }

    pub fn gas_cost(&self, gas_estimate: u64) -> Option<U256> {
        U256::from(gas_estimate).checked_mul(self.gas_price)
    }

    pub fn total_cost(&self, amount_in: U256, gas_estimate: u64) -> Option<U256> {
        let premium = mul_bps(amount_in, self.flash_premium_bps)?;
        self.gas_cost(gas_estimate)?.checked_add(premium)
    }

    /// `final_output - amount_in - cost`, or `None` when the route does not
    /// pay for itself or its cost overflows.
    pub fn net_profit(&self, amount_in: U256, final_output: U256, gas_estimate: u64) -> Option<U256> {
        let spent = amount_in.checked_add(self.total_cost(amount_in, gas_estimate)?)?;
        final_output.checked_sub(spent).filter(|profit| !profit.is_zero())
    }
}
