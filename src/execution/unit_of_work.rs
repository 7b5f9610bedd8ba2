use super::flash_lender::{FlashLender, FlashLoan};
use crate::errors::{ArbError, ArbResult};
use crate::venues::{VenueBackend, VenueSelection};
use alloy_primitives::{Address, U256};
use std::collections::BTreeMap;

/// Working copy of everything an execution may touch. Legs, borrowing and
/// repayment all run against the copy; the caller either takes the parts back
/// with [`UnitOfWork::into_parts`] on success or drops the unit, which
/// discards every effect.
#[derive(Clone, Debug)]
pub struct UnitOfWork<V: VenueBackend> {
    venues: V,
    lender: FlashLender,
    base_token: Address,
    holdings: BTreeMap<Address, U256>,
    loan: Option<FlashLoan>,
}

impl<V: VenueBackend> UnitOfWork<V> {
    pub fn begin(venues: &V, lender: &FlashLender, base_token: Address, balance: U256) -> Self {
        Self {
            venues: venues.clone(),
            lender: lender.clone(),
            base_token,
            holdings: BTreeMap::from([(base_token, balance)]),
            loan: None,
        }
    }

    pub fn holding(&self, token: &Address) -> U256 {
        self.holdings.get(token).copied().unwrap_or_default()
    }

    pub fn base_balance(&self) -> U256 {
        self.holding(&self.base_token)
    }

    pub fn borrow(&mut self, amount: U256, premium_bps: u32) -> ArbResult<()> {
        let loan = self.lender.borrow(amount, premium_bps)?;
        self.credit(self.base_token, amount);
        self.loan = Some(loan);
        Ok(())
    }

    /// Leg `leg` (1-based) swapping `amount_in` of `token_in`; the output must
    /// reach `min_out`.
    pub fn swap(
        &mut self,
        leg: usize,
        token_in: Address,
        token_out: Address,
        amount_in: U256,
        selection: VenueSelection,
        min_out: U256,
    ) -> ArbResult<U256> {
        self.debit(token_in, amount_in)?;
        let amount_out = self
            .venues
            .swap(token_in, token_out, amount_in, selection)
            .map_err(|source| ArbError::VenueUnavailable { leg, venue: selection.venue, source })?;
        if amount_out < min_out {
            return Err(ArbError::SlippageExceeded { leg, amount_out, min_out });
        }
        self.credit(token_out, amount_out);
        Ok(amount_out)
    }

    /// Repays the outstanding loan, if any, and returns the premium paid.
    pub fn repay(&mut self) -> ArbResult<U256> {
        let Some(loan) = self.loan.take() else {
            return Ok(U256::ZERO);
        };
        let available = self.base_balance();
        if available < loan.owed() {
            return Err(ArbError::LoanRepaymentFailed { owed: loan.owed(), available });
        }
        self.debit(self.base_token, loan.owed())?;
        self.lender.repay(&loan);
        Ok(loan.premium)
    }

    pub fn into_parts(self) -> (V, FlashLender, U256) {
        let balance = self.base_balance();
        (self.venues, self.lender, balance)
    }

    fn credit(&mut self, token: Address, amount: U256) {
        let entry = self.holdings.entry(token).or_default();
        *entry = entry.saturating_add(amount);
    }

    fn debit(&mut self, token: Address, amount: U256) -> ArbResult<()> {
        let available = self.holding(&token);
        if available < amount {
            return Err(ArbError::InsufficientBalance { requested: amount, available });
        }
        self.holdings.insert(token, available - amount);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::venues::{FixedRatePool, Venue, VenueBook};

    fn base() -> Address {
        Address::repeat_byte(0xee)
    }

    fn tkn() -> Address {
        Address::repeat_byte(1)
    }

    fn book() -> VenueBook {
        let mut book = VenueBook::new();
        book.add_pool(FixedRatePool::new(Venue::UniswapV2, base(), tkn(), (2, 1), (1, 1)));
        book
    }

    #[test]
    fn test_dropped_unit_leaves_sources_untouched() -> eyre::Result<()> {
        let book = book();
        let lender = FlashLender::new(U256::from(1_000u64));
        let mut unit = UnitOfWork::begin(&book, &lender, base(), U256::ZERO);
        unit.borrow(U256::from(100u64), 0)?;
        unit.swap(1, base(), tkn(), U256::from(100u64), VenueSelection::plain(Venue::UniswapV2), U256::ZERO)?;
        assert_eq!(unit.holding(&tkn()), U256::from(200u64));
        drop(unit);

        assert_eq!(lender.liquidity(), U256::from(1_000u64));
        Ok(())
    }

    #[test]
    fn test_slippage_and_unavailable_legs() {
        let book = book();
        let lender = FlashLender::default();
        let mut unit = UnitOfWork::begin(&book, &lender, base(), U256::from(10u64));
        let err = unit.swap(1, base(), tkn(), U256::from(10u64), VenueSelection::plain(Venue::UniswapV2), U256::from(21u64)).unwrap_err();
        assert_eq!(err, ArbError::SlippageExceeded { leg: 1, amount_out: U256::from(20u64), min_out: U256::from(21u64) });

        let mut unit = UnitOfWork::begin(&book, &lender, base(), U256::from(10u64));
        let err = unit.swap(1, base(), tkn(), U256::from(10u64), VenueSelection::plain(Venue::Sushiswap), U256::ZERO).unwrap_err();
        assert!(matches!(err, ArbError::VenueUnavailable { leg: 1, venue: Venue::Sushiswap, .. }));
    }

    #[test]
    fn test_repayment_shortfall() -> eyre::Result<()> {
        let book = book();
        let lender = FlashLender::new(U256::from(1_000u64));
        let mut unit = UnitOfWork::begin(&book, &lender, base(), U256::ZERO);
        unit.borrow(U256::from(100u64), 0)?;
        // the whole 100 borrowed base is swapped away and the proceeds leave the unit
        unit.swap(1, base(), tkn(), U256::from(100u64), VenueSelection::plain(Venue::UniswapV2), U256::ZERO)?;
        unit.debit(tkn(), U256::from(200u64))?;
        assert_eq!(unit.repay(), Err(ArbError::LoanRepaymentFailed { owed: U256::from(100u64), available: U256::ZERO }));
        Ok(())
    }
}
