use super::venue::{Venue, VenueSelection};
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

/// Why a venue could not produce an output amount.
///
/// During search this only ever means "skip the candidate".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuoteError {
    #[error("no pool on {selection} for {token_in} -> {token_out}")]
    NoPool { selection: VenueSelection, token_in: Address, token_out: Address },
    #[error("pool is paused")]
    Paused,
    #[error("token {0} is not traded by this pool")]
    UnknownToken(Address),
    #[error("insufficient liquidity")]
    InsufficientLiquidity,
    #[error("zero output")]
    ZeroOutput,
    #[error("arithmetic overflow")]
    Overflow,
}

/// Registry key of a pool: venue option plus the unordered token pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolKey {
    pub selection: VenueSelection,
    pub token_a: Address,
    pub token_b: Address,
}

impl PoolKey {
    pub fn new(selection: VenueSelection, token_x: Address, token_y: Address) -> Self {
        let (token_a, token_b) = if token_x <= token_y { (token_x, token_y) } else { (token_y, token_x) };
        Self { selection, token_a, token_b }
    }
}

impl Display for PoolKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{:#}/{:#}", self.selection, self.token_a, self.token_b)
    }
}

#[typetag::serde(tag = "type")]
pub trait Pool: Debug + Sync + Send {
    fn get_venue(&self) -> Venue;

    fn get_fee_tier(&self) -> Option<u32> {
        None
    }

    fn get_selection(&self) -> VenueSelection {
        VenueSelection::new(self.get_venue(), self.get_fee_tier())
    }

    fn get_tokens(&self) -> (Address, Address);

    fn get_key(&self) -> PoolKey {
        let (token0, token1) = self.get_tokens();
        PoolKey::new(self.get_selection(), token0, token1)
    }

    fn is_paused(&self) -> bool;

    fn set_paused(&mut self, paused: bool);

    /// Expected output for `amount_in`, without touching pool state.
    fn calculate_out_amount(&self, token_in: Address, token_out: Address, amount_in: U256) -> Result<U256, QuoteError>;

    /// Execute the swap against pool state and return the output amount.
    fn apply_swap(&mut self, token_in: Address, token_out: Address, amount_in: U256) -> Result<U256, QuoteError>;

    fn clone_box(&self) -> Box<dyn Pool>;
}

impl Clone for Box<dyn Pool> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Shared token-direction check: returns `true` when swapping token0 -> token1.
pub(crate) fn zero_for_one(tokens: (Address, Address), token_in: Address, token_out: Address) -> Result<bool, QuoteError> {
    let (token0, token1) = tokens;
    if token_in == token0 && token_out == token1 {
        Ok(true)
    } else if token_in == token1 && token_out == token0 {
        Ok(false)
    } else if token_in != token0 && token_in != token1 {
        Err(QuoteError::UnknownToken(token_in))
    } else {
        Err(QuoteError::UnknownToken(token_out))
    }
}

/// Integer square root (floor) by Newton iteration.
pub(crate) fn sqrt_u256(value: U256) -> U256 {
    if value < U256::from(2) {
        return value;
    }
    let mut x = (value >> 1) + U256::from(1);
    let mut y = (x + value / x) >> 1;
    while y < x {
        x = y;
        y = (x + value / x) >> 1;
    }
    x
}

pub(crate) fn u256_to_f64(value: U256) -> f64 {
    value.to_string().parse::<f64>().unwrap_or(0.0)
}
