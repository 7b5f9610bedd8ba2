use super::profit::mul_bps;
use super::route_hash::{RouteHash, generate_route_hash};
use crate::utils::constants::{BPS_DENOMINATOR, WETH};
use crate::utils::token::default_token_universe;
use crate::venues::VenueSelection;
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// Ordered token pair of a route. `token_intermediate` is only set for
/// triangle routes (in -> intermediate -> out -> in).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenPair {
    pub token_in: Address,
    pub token_out: Address,
    pub token_intermediate: Option<Address>,
}

impl TokenPair {
    pub fn direct(token_in: Address, token_out: Address) -> Self {
        Self { token_in, token_out, token_intermediate: None }
    }

    pub fn triangle(token_in: Address, token_intermediate: Address, token_out: Address) -> Self {
        Self { token_in, token_out, token_intermediate: Some(token_intermediate) }
    }

    /// Full token sequence of the round trip, starting and ending at `token_in`.
    pub fn route_tokens(&self) -> Vec<Address> {
        match self.token_intermediate {
            Some(intermediate) => vec![self.token_in, intermediate, self.token_out, self.token_in],
            None => vec![self.token_in, self.token_out, self.token_in],
        }
    }
}

/// Best route found by one search call. Never persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArbitrageOpportunity {
    pub token_in: Address,
    pub token_out: Address,
    pub token_intermediate: Option<Address>,
    pub amount_in: U256,
    pub legs: Vec<VenueSelection>,
    /// Quoted output of every leg at search time.
    pub quoted_out_per_leg: Vec<U256>,
    /// Enforced literally at execution time.
    pub min_out_per_leg: Vec<U256>,
    /// `final quoted output - amount_in - gas cost - flash premium`.
    pub expected_profit: U256,
    /// Gas units of the route.
    pub gas_cost_estimate: u64,
    pub is_valid: bool,
    pub is_triangle: bool,
    pub route_hash: RouteHash,
}

impl ArbitrageOpportunity {
    /// The routine "nothing worth doing" result.
    pub fn none(token_in: Address) -> Self {
        Self {
            token_in,
            token_out: token_in,
            token_intermediate: None,
            amount_in: U256::ZERO,
            legs: Vec::new(),
            quoted_out_per_leg: Vec::new(),
            min_out_per_leg: Vec::new(),
            expected_profit: U256::ZERO,
            gas_cost_estimate: 0,
            is_valid: false,
            is_triangle: false,
            route_hash: RouteHash::default(),
        }
    }

    pub fn pair(&self) -> TokenPair {
        TokenPair { token_in: self.token_in, token_out: self.token_out, token_intermediate: self.token_intermediate }
    }

    pub fn route_tokens(&self) -> Vec<Address> {
        self.pair().route_tokens()
    }

    pub fn compute_route_hash(&self) -> RouteHash {
        generate_route_hash(&self.route_tokens(), self.amount_in, &self.legs)
    }

    pub fn final_quoted_output(&self) -> U256 {
        self.quoted_out_per_leg.last().copied().unwrap_or_default()
    }
}

/// Aggregate outcome of one search call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchReport {
    pub opportunity: ArbitrageOpportunity,
    pub candidates_evaluated: u64,
    pub quotes_used: u64,
    pub unavailable_quotes: u64,
    /// The work budget ran out before the enumeration completed.
    pub truncated: bool,
}

impl SearchReport {
    pub fn found(&self) -> bool {
        self.opportunity.is_valid
    }
}

/// Static search parameters, fixed at deployment time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    /// Token every route starts and ends in; budget, balance and costs are
    /// denominated in it.
    pub base_token: Address,
    /// Token universe, the base token included.
    pub tokens: Vec<Address>,
    /// Venue options per leg, in search order.
    pub selections: Vec<VenueSelection>,
    /// Trial amounts as fractions of `max_amount_in`, in basis points.
    pub trial_fractions_bps: Vec<u32>,
    pub two_leg_gas: u64,
    pub triangle_gas: u64,
    pub min_profit_threshold: U256,
    pub slippage_bps: u32,
    /// Gas a single venue quote is charged against a caller gas limit.
    pub quote_gas_cost: u64,
    /// Budget used by plain `search` calls; `None` is exhaustive.
    pub default_work_budget: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_token: WETH,
            tokens: default_token_universe().iter().map(|token| token.get_address()).collect(),
            selections: VenueSelection::all(),
            trial_fractions_bps: vec![1_000, 2_500, 5_000, 7_500, 10_000],
            two_leg_gas: 300_000,
            triangle_gas: 450_000,
            // 0.0005 ETH
            min_profit_threshold: U256::from(500_000_000_000_000u64),
            slippage_bps: 50,
            quote_gas_cost: 25_000,
            default_work_budget: None,
        }
    }
}

impl SearchConfig {
    /// Every token other than the base token, in universe order.
    pub fn counter_tokens(&self) -> impl Iterator<Item = Address> + '_ {
        self.tokens.iter().copied().filter(move |token| *token != self.base_token)
    }

    /// Trial amounts for `max_amount_in`, ascending and de-duplicated.
    pub fn trial_amounts(&self, max_amount_in: U256) -> Vec<U256> {
        let mut amounts: Vec<U256> = self
            .trial_fractions_bps
            .iter()
            .filter_map(|fraction| mul_bps(max_amount_in, (*fraction).min(BPS_DENOMINATOR)))
            .filter(|amount| !amount.is_zero())
            .collect();
        amounts.sort();
        amounts.dedup();
        amounts
    }
}
