use crate::logic::RouteHash;
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// One operator-adjustable setting together with its new value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(tag = "setting", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfigSetting {
    TriangleArbEnabled(bool),
    GasPriceHint(U256),
    FlashPremiumBps(u32),
    DailyLimit(u32),
    CooldownSecs(u64),
}

/// Journal entry appended on every successful state mutation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EngineEvent {
    Deposited {
        from: Address,
        amount: U256,
        timestamp: u64,
    },
    Withdrawn {
        to: Address,
        amount: U256,
        timestamp: u64,
    },
    ArbitrageExecuted {
        caller: Address,
        route_hash: RouteHash,
        amount_in: U256,
        realized_profit: U256,
        premium_paid: U256,
        borrowed: bool,
        is_triangle: bool,
        recipient: Option<Address>,
        timestamp: u64,
    },
    ConfigUpdated {
        setting: ConfigSetting,
        timestamp: u64,
    },
    Paused {
        by: Address,
        timestamp: u64,
    },
    Unpaused {
        by: Address,
        timestamp: u64,
    },
    OperatorTransferred {
        previous: Address,
        new: Address,
        timestamp: u64,
    },
}

impl EngineEvent {
    pub fn timestamp(&self) -> u64 {
        match self {
            EngineEvent::Deposited { timestamp, .. }
            | EngineEvent::Withdrawn { timestamp, .. }
            | EngineEvent::ArbitrageExecuted { timestamp, .. }
            | EngineEvent::ConfigUpdated { timestamp, .. }
            | EngineEvent::Paused { timestamp, .. }
            | EngineEvent::Unpaused { timestamp, .. }
            | EngineEvent::OperatorTransferred { timestamp, .. } => *timestamp,
        }
    }
}
