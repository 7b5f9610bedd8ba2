use super::events::{ConfigSetting, EngineEvent};
use crate::errors::{ArbError, ArbResult};
use crate::execution::rate_limiter::{PolicyLimits, RateLimiter};
use crate::logic::RouteHash;
use crate::utils::constants::BPS_DENOMINATOR;
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use tracing::info;

pub const DEFAULT_FLASH_PREMIUM_BPS: u32 = 5;

/// Lifetime counters; only ever increase, and only with a committed execution.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractStats {
    pub total_trades: u64,
    pub total_volume: U256,
    pub total_profit: U256,
    pub triangle_arb_count: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractConfig {
    pub triangle_arb_enabled: bool,
    /// Zero means "use the caller's gas price".
    pub gas_price_hint: U256,
    pub flash_premium_bps: u32,
    pub operator: Address,
    pub paused: bool,
}

impl ContractConfig {
    pub fn new(operator: Address) -> Self {
        Self {
            triangle_arb_enabled: false,
            gas_price_hint: U256::ZERO,
            flash_premium_bps: DEFAULT_FLASH_PREMIUM_BPS,
            operator,
            paused: false,
        }
    }

    pub fn effective_gas_price(&self, caller_gas_price: U256) -> U256 {
        if self.gas_price_hint.is_zero() { caller_gas_price } else { self.gas_price_hint }
    }
}

/// Everything a committed execution writes back.
#[derive(Clone, Debug)]
pub(crate) struct ExecutionCommit {
    pub caller: Address,
    pub timestamp: u64,
    pub route_hash: RouteHash,
    pub amount_in: U256,
    pub realized_profit: U256,
    pub premium_paid: U256,
    pub borrowed: bool,
    pub is_triangle: bool,
    pub recipient: Option<Address>,
    pub balance_after: U256,
}

/// StateLedger owns every persistent value of the engine: statistics,
/// configuration, per-caller policy state, the base-token balance and the
/// event journal.
///
/// Nothing is writable from outside the crate; each mutation goes through one
/// transition method that validates first and writes only on success.
#[derive(Clone, Debug)]
pub struct StateLedger {
    stats: ContractStats,
    config: ContractConfig,
    rate_limiter: RateLimiter,
    balance: U256,
    events: Vec<EngineEvent>,
}

impl StateLedger {
    pub fn new(config: ContractConfig, limits: PolicyLimits) -> ArbResult<Self> {
        validate_premium(config.flash_premium_bps)?;
        if config.operator.is_zero() {
            return Err(ArbError::InvalidOperator(config.operator));
        }
        Ok(Self {
            stats: ContractStats::default(),
            config,
            rate_limiter: RateLimiter::new(limits),
            balance: U256::ZERO,
            events: Vec::new(),
        })
    }

    pub fn stats(&self) -> &ContractStats {
        &self.stats
    }

    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    pub fn balance(&self) -> U256 {
        self.balance
    }

    pub fn events(&self) -> &[EngineEvent] {
        &self.events
    }

    pub(crate) fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn deposit(&mut self, from: Address, amount: U256, timestamp: u64) -> ArbResult<()> {
        if amount.is_zero() {
            return Err(ArbError::InvalidAmount("deposit amount must be positive".to_string()));
        }
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| ArbError::InvalidAmount("deposit overflows balance".to_string()))?;
        info!("Deposited {} (balance {})", amount, self.balance);
        self.events.push(EngineEvent::Deposited { from, amount, timestamp });
        Ok(())
    }

    pub(crate) fn withdraw(&mut self, to: Address, amount: U256, timestamp: u64) -> ArbResult<()> {
        if amount.is_zero() {
            return Err(ArbError::InvalidAmount("withdraw amount must be positive".to_string()));
        }
        if amount > self.balance {
            return Err(ArbError::InsufficientBalance { requested: amount, available: self.balance });
        }
        self.balance -= amount;
        info!("Withdrew {} (balance {})", amount, self.balance);
        self.events.push(EngineEvent::Withdrawn { to, amount, timestamp });
        Ok(())
    }

    pub(crate) fn update_config(&mut self, setting: ConfigSetting, timestamp: u64) -> ArbResult<()> {
        match setting {
            ConfigSetting::TriangleArbEnabled(enabled) => self.config.triangle_arb_enabled = enabled,
            ConfigSetting::GasPriceHint(gas_price) => self.config.gas_price_hint = gas_price,
            ConfigSetting::FlashPremiumBps(bps) => {
                validate_premium(bps)?;
                self.config.flash_premium_bps = bps;
            }
            ConfigSetting::DailyLimit(limit) => self.rate_limiter.set_daily_limit(limit),
            ConfigSetting::CooldownSecs(secs) => self.rate_limiter.set_cooldown(secs),
        }
        info!("Config updated: {:?}", setting);
        self.events.push(EngineEvent::ConfigUpdated { setting, timestamp });
        Ok(())
    }

    pub(crate) fn set_paused(&mut self, by: Address, paused: bool, timestamp: u64) {
        if self.config.paused == paused {
            return;
        }
        self.config.paused = paused;
        info!("Engine {} by {}", if paused { "paused" } else { "unpaused" }, by);
        self.events.push(if paused { EngineEvent::Paused { by, timestamp } } else { EngineEvent::Unpaused { by, timestamp } });
    }

    pub(crate) fn transfer_operator(&mut self, new: Address, timestamp: u64) -> ArbResult<()> {
        if new.is_zero() {
            return Err(ArbError::InvalidOperator(new));
        }
        let previous = std::mem::replace(&mut self.config.operator, new);
        info!("Operator transferred from {} to {}", previous, new);
        self.events.push(EngineEvent::OperatorTransferred { previous, new, timestamp });
        Ok(())
    }

    /// The only path that touches stats and policy state.
    pub(crate) fn commit_execution(&mut self, commit: ExecutionCommit) {
        self.stats.total_trades += 1;
        self.stats.total_volume = self.stats.total_volume.saturating_add(commit.amount_in);
        self.stats.total_profit = self.stats.total_profit.saturating_add(commit.realized_profit);
        if commit.is_triangle {
            self.stats.triangle_arb_count += 1;
        }
        if commit.borrowed {
            self.rate_limiter.record(commit.caller, commit.timestamp);
        }

        self.balance = commit.balance_after;
        if commit.recipient.is_some() {
            // realized profit is part of balance_after by construction
            self.balance = self.balance.saturating_sub(commit.realized_profit);
        }

        self.events.push(EngineEvent::ArbitrageExecuted {
            caller: commit.caller,
            route_hash: commit.route_hash,
            amount_in: commit.amount_in,
            realized_profit: commit.realized_profit,
            premium_paid: commit.premium_paid,
            borrowed: commit.borrowed,
            is_triangle: commit.is_triangle,
            recipient: commit.recipient,
            timestamp: commit.timestamp,
        });
    }
}

fn validate_premium(bps: u32) -> ArbResult<()> {
    if bps >= BPS_DENOMINATOR {
        return Err(ArbError::InvalidAmount(format!("flash premium must be below {BPS_DENOMINATOR} bps, got {bps}")));
    }
    Ok(())
}
