use crate::access::{AccessGuard, AccessLevel, CallContext};
use crate::config::EngineConfigSection;
use crate::errors::ArbResult;
use crate::execution::{ArbitrageExecutionRequest, ExecutionEngine, ExecutionReceipt, FlashLender, PolicySnapshot};
use crate::logic::{CostModel, OpportunitySearchEngine, SearchConfig, SearchParams, SearchReport, WorkBudget};
use crate::state::{ConfigSetting, ContractConfig, ContractStats, EngineEvent, StateLedger};
use crate::utils::Token;
use crate::venues::{VenueBackend, VenueBook};
use alloy_primitives::{Address, U256};
use serde::Serialize;
use tracing::{info, warn};

/// Read-only snapshot served to the dashboard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EngineStatus {
    pub stats: ContractStats,
    pub config: ContractConfig,
    /// Policy state of the calling account.
    pub policy: PolicySnapshot,
    pub balance: U256,
    pub can_execute_borrowed: bool,
    pub lender_liquidity: U256,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AutoExecuteOutcome {
    /// Routine outcome: nothing worth executing right now.
    NoOpportunity(SearchReport),
    Executed { report: SearchReport, receipt: ExecutionReceipt },
}

impl AutoExecuteOutcome {
    pub fn receipt(&self) -> Option<&ExecutionReceipt> {
        match self {
            AutoExecuteOutcome::NoOpportunity(_) => None,
            AutoExecuteOutcome::Executed { receipt, .. } => Some(receipt),
        }
    }

    pub fn report(&self) -> &SearchReport {
        match self {
            AutoExecuteOutcome::NoOpportunity(report) => report,
            AutoExecuteOutcome::Executed { report, .. } => report,
        }
    }
}

/// External interface of the engine.
///
/// Reads (`search`, `status`) are open to anyone. Every mutating call passes
/// through [`AccessGuard`] first: executions need a live engine, funding,
/// configuration and pause management only need the operator identity.
pub struct ArbitrageBot<V: VenueBackend = VenueBook> {
    search_engine: OpportunitySearchEngine,
    venues: V,
    lender: FlashLender,
    ledger: StateLedger,
}

impl ArbitrageBot<VenueBook> {
    pub fn from_config(section: &EngineConfigSection, operator: Address) -> ArbResult<Self> {
        let ledger = StateLedger::new(section.contract_config(operator), section.policy_limits())?;
        let tokens = section.tokens();
        let base = tokens
            .iter()
            .find(|token| token.get_address() == section.base_token)
            .cloned()
            .unwrap_or_else(|| Token::new(section.base_token));
        let symbols: Vec<String> = tokens.iter().map(Token::get_symbol).collect();
        info!(
            "Engine configured with {} pools over [{}], flash liquidity {:.4} {}, operator {}",
            section.pools.len(),
            symbols.join(", "),
            base.to_float(section.flash_liquidity),
            base.get_symbol(),
            operator
        );
        Ok(Self::new(section.search_config(), section.venue_book(), section.flash_lender(), ledger))
    }
}

impl<V: VenueBackend> ArbitrageBot<V> {
    pub fn new(search_config: SearchConfig, venues: V, lender: FlashLender, ledger: StateLedger) -> Self {
        Self { search_engine: OpportunitySearchEngine::new(search_config), venues, lender, ledger }
    }

    pub fn search_config(&self) -> &SearchConfig {
        self.search_engine.config()
    }

    pub fn venues(&self) -> &V {
        &self.venues
    }

    /// Venue state moves independently of the engine (other traders, pool
    /// pauses); this is where that movement is applied.
    pub fn venues_mut(&mut self) -> &mut V {
        &mut self.venues
    }

    pub fn lender(&self) -> &FlashLender {
        &self.lender
    }

    pub fn ledger(&self) -> &StateLedger {
        &self.ledger
    }

    pub fn search(&self, ctx: &CallContext, max_amount_in: U256) -> ArbResult<SearchReport> {
        let budget = self.search_config().default_work_budget.map(WorkBudget::limited).unwrap_or_default();
        self.search_with_budget(ctx, max_amount_in, budget)
    }

    pub fn search_with_budget(&self, ctx: &CallContext, max_amount_in: U256, budget: WorkBudget) -> ArbResult<SearchReport> {
        let config = self.ledger.config();
        let params = SearchParams {
            max_amount_in,
            costs: CostModel::new(config.effective_gas_price(ctx.gas_price), config.flash_premium_bps),
            triangle_enabled: config.triangle_arb_enabled,
            budget,
        };
        self.search_engine.search(&self.venues, params)
    }

    pub fn status(&self, ctx: &CallContext) -> EngineStatus {
        let config = self.ledger.config();
        let limiter = self.ledger.rate_limiter();
        EngineStatus {
            stats: self.ledger.stats().clone(),
            config: config.clone(),
            policy: limiter.snapshot(&ctx.caller, ctx.timestamp),
            balance: self.ledger.balance(),
            can_execute_borrowed: limiter.can_execute_borrowed(&ctx.caller, ctx.timestamp, config.paused),
            lender_liquidity: self.lender.liquidity(),
        }
    }

    /// Searches with a budget derived from `gas_limit_hint` (zero keeps the
    /// default budget) and executes the best route if one is valid.
    pub fn auto_execute(&mut self, ctx: &CallContext, max_amount_in: U256, gas_limit_hint: u64) -> ArbResult<AutoExecuteOutcome> {
        self.guarded(ctx, AccessLevel::OperatorLive, |bot| {
            let report = if gas_limit_hint == 0 {
                bot.search(ctx, max_amount_in)?
            } else {
                let budget = WorkBudget::from_gas_limit(gas_limit_hint, bot.search_config().quote_gas_cost);
                bot.search_with_budget(ctx, max_amount_in, budget)?
            };
            if !report.found() {
                info!("No opportunity found for max amount {}", max_amount_in);
                return Ok(AutoExecuteOutcome::NoOpportunity(report));
            }

            let min_net_profit = bot.search_config().min_profit_threshold;
            let request = ArbitrageExecutionRequest::from_opportunity(&report.opportunity, ctx.timestamp)
                .with_gas_price_hint(bot.ledger.config().effective_gas_price(ctx.gas_price))
                .with_min_net_profit(min_net_profit);
            let receipt = bot.run_execution(ctx, &request, min_net_profit)?;
            Ok(AutoExecuteOutcome::Executed { report, receipt })
        })
    }

    /// Executes a caller-supplied route without re-searching. The stricter of
    /// `request.min_net_profit` and `min_net_profit` applies.
    pub fn execute_specific(
        &mut self,
        ctx: &CallContext,
        request: &ArbitrageExecutionRequest,
        min_net_profit: U256,
    ) -> ArbResult<ExecutionReceipt> {
        self.guarded(ctx, AccessLevel::OperatorLive, |bot| bot.run_execution(ctx, request, request.min_net_profit.max(min_net_profit)))
    }

    pub fn deposit(&mut self, ctx: &CallContext, amount: U256) -> ArbResult<()> {
        self.guarded(ctx, AccessLevel::Operator, |bot| bot.ledger.deposit(ctx.caller, amount, ctx.timestamp))
    }

    pub fn withdraw(&mut self, ctx: &CallContext, amount: U256) -> ArbResult<()> {
        self.guarded(ctx, AccessLevel::Operator, |bot| bot.ledger.withdraw(ctx.caller, amount, ctx.timestamp))
    }

    pub fn set_triangle_arb_enabled(&mut self, ctx: &CallContext, enabled: bool) -> ArbResult<()> {
        self.update_config(ctx, ConfigSetting::TriangleArbEnabled(enabled))
    }

    pub fn set_gas_price_hint(&mut self, ctx: &CallContext, gas_price: U256) -> ArbResult<()> {
        self.update_config(ctx, ConfigSetting::GasPriceHint(gas_price))
    }

    pub fn set_flash_premium_bps(&mut self, ctx: &CallContext, bps: u32) -> ArbResult<()> {
        self.update_config(ctx, ConfigSetting::FlashPremiumBps(bps))
    }

    pub fn set_daily_limit(&mut self, ctx: &CallContext, limit: u32) -> ArbResult<()> {
        self.update_config(ctx, ConfigSetting::DailyLimit(limit))
    }

    pub fn set_cooldown(&mut self, ctx: &CallContext, secs: u64) -> ArbResult<()> {
        self.update_config(ctx, ConfigSetting::CooldownSecs(secs))
    }

    pub fn pause(&mut self, ctx: &CallContext) -> ArbResult<()> {
        self.guarded(ctx, AccessLevel::Operator, |bot| {
            bot.ledger.set_paused(ctx.caller, true, ctx.timestamp);
            Ok(())
        })
    }

    pub fn unpause(&mut self, ctx: &CallContext) -> ArbResult<()> {
        self.guarded(ctx, AccessLevel::Operator, |bot| {
            bot.ledger.set_paused(ctx.caller, false, ctx.timestamp);
            Ok(())
        })
    }

    pub fn transfer_operator(&mut self, ctx: &CallContext, new_operator: Address) -> ArbResult<()> {
        self.guarded(ctx, AccessLevel::Operator, |bot| bot.ledger.transfer_operator(new_operator, ctx.timestamp))
    }

    /// Hands the event journal to the caller, leaving it empty.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        self.ledger.drain_events()
    }

    fn update_config(&mut self, ctx: &CallContext, setting: ConfigSetting) -> ArbResult<()> {
        self.guarded(ctx, AccessLevel::Operator, |bot| bot.ledger.update_config(setting, ctx.timestamp))
    }

    fn guarded<T>(&mut self, ctx: &CallContext, level: AccessLevel, op: impl FnOnce(&mut Self) -> ArbResult<T>) -> ArbResult<T> {
        if let Err(e) = AccessGuard::authorize(self.ledger.config(), ctx, level) {
            warn!("Rejected {} call from {}: {}", level, ctx.caller, e);
            return Err(e);
        }
        op(self)
    }

    fn run_execution(
        &mut self,
        ctx: &CallContext,
        request: &ArbitrageExecutionRequest,
        min_net_profit: U256,
    ) -> ArbResult<ExecutionReceipt> {
        let base_token = self.search_engine.config().base_token;
        ExecutionEngine::new(base_token, &mut self.ledger, &mut self.venues, &mut self.lender).execute(ctx, request, min_net_profit)
    }
}
