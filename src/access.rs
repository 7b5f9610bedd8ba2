use crate::errors::{ArbError, ArbResult};
use crate::state::ContractConfig;
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Identity and environment of one external call, supplied by the signing
/// layer. The engine never reads the wall clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    pub caller: Address,
    /// Block timestamp in seconds.
    pub timestamp: u64,
    /// Gas price of the call, used when no gas price hint is configured.
    pub gas_price: U256,
}

impl CallContext {
    pub fn new(caller: Address, timestamp: u64, gas_price: U256) -> Self {
        Self { caller, timestamp, gas_price }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessLevel {
    /// Operator identity only; funding, configuration and pause management.
    Operator,
    /// Operator identity on a running engine; executions.
    OperatorLive,
}

/// The one authorization check every mutating entry point passes through.
pub struct AccessGuard;

impl AccessGuard {
    pub fn authorize(config: &ContractConfig, ctx: &CallContext, level: AccessLevel) -> ArbResult<()> {
        if ctx.caller != config.operator {
            return Err(ArbError::NotOperator(ctx.caller));
        }
        if level == AccessLevel::OperatorLive && config.paused {
            return Err(ArbError::Paused);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorize_levels() {
        let operator = Address::repeat_byte(1);
        let mut config = ContractConfig::new(operator);
        let ctx = CallContext::new(operator, 0, U256::ZERO);
        let stranger = CallContext::new(Address::repeat_byte(2), 0, U256::ZERO);

        assert!(AccessGuard::authorize(&config, &ctx, AccessLevel::OperatorLive).is_ok());
        assert_eq!(AccessGuard::authorize(&config, &stranger, AccessLevel::Operator), Err(ArbError::NotOperator(stranger.caller)));

        config.paused = true;
        assert_eq!(AccessGuard::authorize(&config, &ctx, AccessLevel::OperatorLive), Err(ArbError::Paused));
        assert!(AccessGuard::authorize(&config, &ctx, AccessLevel::Operator).is_ok());
        // identity is checked before the pause flag
        assert_eq!(AccessGuard::authorize(&config, &stranger, AccessLevel::OperatorLive), Err(ArbError::NotOperator(stranger.caller)));
    }
}
