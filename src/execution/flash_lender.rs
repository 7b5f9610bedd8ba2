use crate::errors::{ArbError, ArbResult};
use crate::logic::flash_premium;
use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// Outstanding borrow inside one unit of work.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlashLoan {
    pub principal: U256,
    pub premium: U256,
}

impl FlashLoan {
    pub fn owed(&self) -> U256 {
        self.principal.saturating_add(self.premium)
    }
}

/// Base-token liquidity provider for borrowed-capital executions. Loans must
/// be repaid with premium inside the same unit of work.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashLender {
    liquidity: U256,
    premiums_earned: U256,
}

impl FlashLender {
    pub fn new(liquidity: U256) -> Self {
        Self { liquidity, premiums_earned: U256::ZERO }
    }

    pub fn liquidity(&self) -> U256 {
        self.liquidity
    }

    pub fn premiums_earned(&self) -> U256 {
        self.premiums_earned
    }

    pub fn borrow(&mut self, amount: U256, premium_bps: u32) -> ArbResult<FlashLoan> {
        if amount > self.liquidity {
            return Err(ArbError::FlashLoanUnavailable { requested: amount, available: self.liquidity });
        }
        self.liquidity -= amount;
        Ok(FlashLoan { principal: amount, premium: flash_premium(amount, premium_bps) })
    }

    pub fn repay(&mut self, loan: &FlashLoan) {
        self.liquidity = self.liquidity.saturating_add(loan.principal);
        self.premiums_earned = self.premiums_earned.saturating_add(loan.premium);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_borrow_and_repay() -> eyre::Result<()> {
        let mut lender = FlashLender::new(U256::from(1_000_000u64));
        let loan = lender.borrow(U256::from(400_000u64), 5)?;
        assert_eq!(loan.premium, U256::from(200u64));
        assert_eq!(lender.liquidity(), U256::from(600_000u64));

        lender.repay(&loan);
        assert_eq!(lender.liquidity(), U256::from(1_000_000u64));
        assert_eq!(lender.premiums_earned(), U256::from(200u64));
        Ok(())
    }

    #[test]
    fn test_borrow_beyond_liquidity() {
        let mut lender = FlashLender::new(U256::from(10u64));
        assert_eq!(
            lender.borrow(U256::from(11u64), 5),
            Err(ArbError::FlashLoanUnavailable { requested: U256::from(11u64), available: U256::from(10u64) })
        );
        assert_eq!(lender.liquidity(), U256::from(10u64));
    }
}
