use crate::logic::{ArbitrageOpportunity, RouteHash, TokenPair, generate_route_hash};
use crate::venues::VenueSelection;
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// A route handed to the execution engine, either straight from a search or
/// supplied by the operator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArbitrageExecutionRequest {
    pub token_in: Address,
    pub token_out: Address,
    #[serde(default)]
    pub token_intermediate: Option<Address>,
    pub amount_in: U256,
    pub legs: Vec<VenueSelection>,
    pub min_out_per_leg: Vec<U256>,
    pub gas_cost_estimate: u64,
    pub is_triangle: bool,
    /// Latest block timestamp at which the request may still run.
    pub deadline: u64,
    /// `None` keeps the profit in the engine balance.
    #[serde(default)]
    pub recipient: Option<Address>,
    #[serde(default)]
    pub min_net_profit: U256,
    #[serde(default)]
    pub gas_price_hint: U256,
    #[serde(default = "default_use_own_liquidity_first")]
    pub use_own_liquidity_first: bool,
}

fn default_use_own_liquidity_first() -> bool {
    true
}

impl ArbitrageExecutionRequest {
    pub fn from_opportunity(opportunity: &ArbitrageOpportunity, deadline: u64) -> Self {
        Self {
            token_in: opportunity.token_in,
            token_out: opportunity.token_out,
            token_intermediate: opportunity.token_intermediate,
            amount_in: opportunity.amount_in,
            legs: opportunity.legs.clone(),
            min_out_per_leg: opportunity.min_out_per_leg.clone(),
            gas_cost_estimate: opportunity.gas_cost_estimate,
            is_triangle: opportunity.is_triangle,
            deadline,
            recipient: None,
            min_net_profit: U256::ZERO,
            gas_price_hint: U256::ZERO,
            use_own_liquidity_first: true,
        }
    }

    pub fn with_recipient(mut self, recipient: Address) -> Self {
        self.recipient = Some(recipient);
        self
    }

    pub fn with_min_net_profit(mut self, min_net_profit: U256) -> Self {
        self.min_net_profit = min_net_profit;
        self
    }

    pub fn with_gas_price_hint(mut self, gas_price_hint: U256) -> Self {
        self.gas_price_hint = gas_price_hint;
        self
    }

    pub fn with_own_liquidity_first(mut self, use_own_liquidity_first: bool) -> Self {
        self.use_own_liquidity_first = use_own_liquidity_first;
        self
    }

    pub fn pair(&self) -> TokenPair {
        TokenPair { token_in: self.token_in, token_out: self.token_out, token_intermediate: self.token_intermediate }
    }

    pub fn route_tokens(&self) -> Vec<Address> {
        self.pair().route_tokens()
    }

    pub fn route_hash(&self) -> RouteHash {
        generate_route_hash(&self.route_tokens(), self.amount_in, &self.legs)
    }
}

/// Outcome of a committed execution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionReceipt {
    pub route_hash: RouteHash,
    pub amount_in: U256,
    pub final_output: U256,
    pub realized_profit: U256,
    pub borrowed: bool,
    pub premium_paid: U256,
    pub is_triangle: bool,
    pub recipient: Option<Address>,
}
