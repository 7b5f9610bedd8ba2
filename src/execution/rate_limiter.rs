use crate::errors::{ArbError, ArbResult};
use crate::utils::constants::ROLLING_DAY_SECS;
use ahash::AHashMap;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub const DEFAULT_COOLDOWN_SECS: u64 = 300;
pub const DEFAULT_DAILY_LIMIT: u32 = 150;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyLimits {
    pub daily_limit: u32,
    pub cooldown_secs: u64,
}

impl Default for PolicyLimits {
    fn default() -> Self {
        Self { daily_limit: DEFAULT_DAILY_LIMIT, cooldown_secs: DEFAULT_COOLDOWN_SECS }
    }
}

/// Borrowed-capital history of one caller: the timestamps of its borrowed
/// executions still inside the rolling 24h window, oldest first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountPolicyState {
    borrowed_at: VecDeque<u64>,
}

impl AccountPolicyState {
    pub fn last_borrowed_execution_at(&self) -> Option<u64> {
        self.borrowed_at.back().copied()
    }

    pub fn borrowed_executions_today(&self, now: u64) -> u32 {
        let in_window = self.borrowed_at.iter().filter(|at| now.saturating_sub(**at) < ROLLING_DAY_SECS).count();
        u32::try_from(in_window).unwrap_or(u32::MAX)
    }

    pub fn remaining_cooldown(&self, now: u64, cooldown_secs: u64) -> u64 {
        self.last_borrowed_execution_at()
            .map(|last| last.saturating_add(cooldown_secs).saturating_sub(now))
            .unwrap_or(0)
    }

    fn record(&mut self, now: u64) {
        while self.borrowed_at.front().is_some_and(|at| now.saturating_sub(*at) >= ROLLING_DAY_SECS) {
            self.borrowed_at.pop_front();
        }
        self.borrowed_at.push_back(now);
    }
}

/// Read-only view of a caller's policy state at a given time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicySnapshot {
    pub last_borrowed_execution_at: Option<u64>,
    pub borrowed_executions_today: u32,
    pub daily_limit: u32,
    pub remaining_cooldown: u64,
}

impl PolicySnapshot {
    pub fn admits_borrow(&self) -> bool {
        self.remaining_cooldown == 0 && self.borrowed_executions_today < self.daily_limit
    }
}

/// Per-caller cooldown and rolling daily cap on borrowed-capital executions.
/// Own-liquidity executions never reach it.
#[derive(Clone, Debug, Default)]
pub struct RateLimiter {
    limits: PolicyLimits,
    accounts: AHashMap<Address, AccountPolicyState>,
}

impl RateLimiter {
    pub fn new(limits: PolicyLimits) -> Self {
        Self { limits, accounts: AHashMap::new() }
    }

    pub fn limits(&self) -> PolicyLimits {
        self.limits
    }

    pub fn account(&self, caller: &Address) -> Option<&AccountPolicyState> {
        self.accounts.get(caller)
    }

    pub fn snapshot(&self, caller: &Address, now: u64) -> PolicySnapshot {
        let state = self.accounts.get(caller);
        PolicySnapshot {
            last_borrowed_execution_at: state.and_then(AccountPolicyState::last_borrowed_execution_at),
            borrowed_executions_today: state.map(|s| s.borrowed_executions_today(now)).unwrap_or(0),
            daily_limit: self.limits.daily_limit,
            remaining_cooldown: state.map(|s| s.remaining_cooldown(now, self.limits.cooldown_secs)).unwrap_or(0),
        }
    }

    pub fn can_execute_borrowed(&self, caller: &Address, now: u64, paused: bool) -> bool {
        !paused && self.snapshot(caller, now).admits_borrow()
    }

    /// Admission check for a borrowed execution at `now`; does not record it.
    pub fn check(&self, caller: &Address, now: u64) -> ArbResult<()> {
        let snapshot = self.snapshot(caller, now);
        if snapshot.remaining_cooldown > 0 {
            return Err(ArbError::CooldownActive { remaining_secs: snapshot.remaining_cooldown });
        }
        if snapshot.borrowed_executions_today >= snapshot.daily_limit {
            return Err(ArbError::DailyLimitExceeded { used: snapshot.borrowed_executions_today, limit: snapshot.daily_limit });
        }
        Ok(())
    }

    pub(crate) fn record(&mut self, caller: Address, now: u64) {
        self.accounts.entry(caller).or_default().record(now);
    }

    pub(crate) fn set_daily_limit(&mut self, daily_limit: u32) {
        self.limits.daily_limit = daily_limit;
    }

    pub(crate) fn set_cooldown(&mut self, cooldown_secs: u64) {
        self.limits.cooldown_secs = cooldown_secs;
    }
}
