use crate::execution::{DEFAULT_COOLDOWN_SECS, DEFAULT_DAILY_LIMIT, FlashLender, PolicyLimits};
use crate::logic::SearchConfig;
use crate::state::{ContractConfig, DEFAULT_FLASH_PREMIUM_BPS};
use crate::utils::config_loader::{
    ArbConfigLoader, ArbConfigLoaderSync, LoadConfigError, load_from_file, load_from_file_sync, load_from_str,
};
use crate::utils::{Token, default_token_universe};
use crate::venues::{Pool, VenueBook, VenueSelection};
use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct EngineConfigRoot {
    pub engine: EngineConfigSection,
}

/// Deployment-time parameters of the engine: token universe, venue state,
/// search constants and the initial operator configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfigSection {
    pub base_token: Address,
    /// Empty means the default mainnet universe.
    pub tokens: Vec<Token>,
    /// Empty means every venue option.
    pub selections: Vec<VenueSelection>,
    pub pools: Vec<Box<dyn Pool>>,
    pub trial_fractions_bps: Vec<u32>,
    pub two_leg_gas: u64,
    pub triangle_gas: u64,
    pub min_profit_threshold: U256,
    pub slippage_bps: u32,
    pub quote_gas_cost: u64,
    pub default_work_budget: Option<u64>,
    pub triangle_arb_enabled: bool,
    pub gas_price_hint: U256,
    pub flash_premium_bps: u32,
    pub daily_limit: u32,
    pub cooldown_secs: u64,
    pub flash_liquidity: U256,
}

impl Default for EngineConfigSection {
    fn default() -> Self {
        let search = SearchConfig::default();
        Self {
            base_token: search.base_token,
            tokens: Vec::new(),
            selections: Vec::new(),
            pools: Vec::new(),
            trial_fractions_bps: search.trial_fractions_bps,
            two_leg_gas: search.two_leg_gas,
            triangle_gas: search.triangle_gas,
            min_profit_threshold: search.min_profit_threshold,
            slippage_bps: search.slippage_bps,
            quote_gas_cost: search.quote_gas_cost,
            default_work_budget: search.default_work_budget,
            triangle_arb_enabled: false,
            gas_price_hint: U256::ZERO,
            flash_premium_bps: DEFAULT_FLASH_PREMIUM_BPS,
            daily_limit: DEFAULT_DAILY_LIMIT,
            cooldown_secs: DEFAULT_COOLDOWN_SECS,
            flash_liquidity: U256::ZERO,
        }
    }
}

impl EngineConfigSection {
    pub fn with_pools(mut self, pools: Vec<Box<dyn Pool>>) -> Self {
        self.pools = pools;
        self
    }

    pub fn tokens(&self) -> Vec<Token> {
        if self.tokens.is_empty() { default_token_universe() } else { self.tokens.clone() }
    }

    pub fn search_config(&self) -> SearchConfig {
        let mut tokens: Vec<Address> = self.tokens().iter().map(|token| token.get_address()).collect();
        if !tokens.contains(&self.base_token) {
            tokens.insert(0, self.base_token);
        }
        SearchConfig {
            base_token: self.base_token,
            tokens,
            selections: if self.selections.is_empty() { VenueSelection::all() } else { self.selections.clone() },
            trial_fractions_bps: self.trial_fractions_bps.clone(),
            two_leg_gas: self.two_leg_gas,
            triangle_gas: self.triangle_gas,
            min_profit_threshold: self.min_profit_threshold,
            slippage_bps: self.slippage_bps,
            quote_gas_cost: self.quote_gas_cost,
            default_work_budget: self.default_work_budget,
        }
    }

    pub fn contract_config(&self, operator: Address) -> ContractConfig {
        ContractConfig {
            triangle_arb_enabled: self.triangle_arb_enabled,
            gas_price_hint: self.gas_price_hint,
            flash_premium_bps: self.flash_premium_bps,
            operator,
            paused: false,
        }
    }

    pub fn policy_limits(&self) -> PolicyLimits {
        PolicyLimits { daily_limit: self.daily_limit, cooldown_secs: self.cooldown_secs }
    }

    pub fn venue_book(&self) -> VenueBook {
        self.pools.iter().cloned().collect()
    }

    pub fn flash_lender(&self) -> FlashLender {
        FlashLender::new(self.flash_liquidity)
    }
}

#[async_trait]
impl ArbConfigLoader for EngineConfigSection {
    type SectionType = EngineConfigSection;

    async fn load_section_from_file(file_name: String) -> Result<Self::SectionType, LoadConfigError> {
        let root: EngineConfigRoot = load_from_file(file_name).await?;
        Ok(root.engine)
    }
}

impl ArbConfigLoaderSync for EngineConfigSection {
    type SectionType = EngineConfigSection;

    fn load_section_from_file_sync(file_name: String) -> Result<Self::SectionType, LoadConfigError> {
        let root: EngineConfigRoot = load_from_file_sync(file_name)?;
        Ok(root.engine)
    }

    fn load_section_from_str(contents: &str) -> Result<Self::SectionType, LoadConfigError> {
        let root: EngineConfigRoot = load_from_str(contents)?;
        Ok(root.engine)
    }
}
