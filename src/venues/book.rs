use super::pool::{Pool, PoolKey, QuoteError};
use super::venue::VenueSelection;
use alloy_primitives::{Address, U256};
use std::collections::BTreeMap;
use tracing::debug;

/// Uniform quoting interface across venue types.
///
/// Implementations must be side-effect free. Any venue-level failure is
/// reported as a `QuoteError`, never as a panic.
pub trait VenueQuoteAdapter {
    fn quote(&self, token_in: Address, token_out: Address, amount_in: U256, selection: VenueSelection) -> Result<U256, QuoteError>;
}

/// Venue state that can also execute swaps. `Clone` is what lets the
/// execution unit run against a scratch copy and discard it on failure.
pub trait VenueBackend: VenueQuoteAdapter + Clone + Send + Sync {
    fn swap(&mut self, token_in: Address, token_out: Address, amount_in: U256, selection: VenueSelection) -> Result<U256, QuoteError>;
}

impl<T: VenueQuoteAdapter + ?Sized> VenueQuoteAdapter for &T {
    fn quote(&self, token_in: Address, token_out: Address, amount_in: U256, selection: VenueSelection) -> Result<U256, QuoteError> {
        (**self).quote(token_in, token_out, amount_in, selection)
    }
}

/// In-memory registry of every pool, keyed by venue option and token pair.
///
/// Iteration order is the `BTreeMap` key order, so anything derived from the
/// book is deterministic.
#[derive(Clone, Debug, Default)]
pub struct VenueBook {
    pools: BTreeMap<PoolKey, Box<dyn Pool>>,
}

impl VenueBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pool, replacing any pool registered under the same key.
    pub fn add_pool<P: Pool + 'static>(&mut self, pool: P) -> Option<Box<dyn Pool>> {
        self.add_boxed_pool(Box::new(pool))
    }

    pub fn add_boxed_pool(&mut self, pool: Box<dyn Pool>) -> Option<Box<dyn Pool>> {
        let key = pool.get_key();
        debug!(%key, "registering pool");
        self.pools.insert(key, pool)
    }

    pub fn get_pool(&self, selection: VenueSelection, token_x: Address, token_y: Address) -> Option<&dyn Pool> {
        self.pools.get(&PoolKey::new(selection, token_x, token_y)).map(|pool| pool.as_ref())
    }

    pub fn get_pool_mut(&mut self, selection: VenueSelection, token_x: Address, token_y: Address) -> Option<&mut Box<dyn Pool>> {
        self.pools.get_mut(&PoolKey::new(selection, token_x, token_y))
    }

    pub fn set_pool_paused(&mut self, selection: VenueSelection, token_x: Address, token_y: Address, paused: bool) -> bool {
        match self.get_pool_mut(selection, token_x, token_y) {
            Some(pool) => {
                pool.set_paused(paused);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    fn no_pool(selection: VenueSelection, token_in: Address, token_out: Address) -> QuoteError {
        QuoteError::NoPool { selection, token_in, token_out }
    }
}

impl VenueQuoteAdapter for VenueBook {
    fn quote(&self, token_in: Address, token_out: Address, amount_in: U256, selection: VenueSelection) -> Result<U256, QuoteError> {
        let pool = self.get_pool(selection, token_in, token_out).ok_or_else(|| Self::no_pool(selection, token_in, token_out))?;
        pool.calculate_out_amount(token_in, token_out, amount_in)
    }
}

impl VenueBackend for VenueBook {
    fn swap(&mut self, token_in: Address, token_out: Address, amount_in: U256, selection: VenueSelection) -> Result<U256, QuoteError> {
        let pool =
            self.get_pool_mut(selection, token_in, token_out).ok_or_else(|| Self::no_pool(selection, token_in, token_out))?;
        pool.apply_swap(token_in, token_out, amount_in)
    }
}

impl FromIterator<Box<dyn Pool>> for VenueBook {
    fn from_iter<I: IntoIterator<Item = Box<dyn Pool>>>(iter: I) -> Self {
        let mut book = VenueBook::new();
        for pool in iter {
            book.add_boxed_pool(pool);
        }
        book
    }
}
