use super::budget::WorkBudget;
use super::profit::{CostModel, apply_slippage};
use super::types::{ArbitrageOpportunity, SearchConfig, SearchReport, TokenPair};
use crate::errors::{ArbError, ArbResult};
use crate::venues::{VenueQuoteAdapter, VenueSelection};
use alloy_primitives::{Address, U256};
use tracing::{debug, trace, warn};

/// Per-call inputs of a search.
#[derive(Clone, Copy, Debug)]
pub struct SearchParams {
    pub max_amount_in: U256,
    pub costs: CostModel,
    pub triangle_enabled: bool,
    pub budget: WorkBudget,
}

/// OpportunitySearchEngine enumerates candidate routes against current venue
/// quotes and keeps the single most profitable one.
///
/// A candidate whose slippage-bounded worst case clears the profit threshold
/// always outranks one that does not; among equals the higher quoted net
/// profit wins. Enumeration order is fixed (direct routes, then triangles;
/// tokens in universe order; trial amounts ascending; venue selections in
/// configured order), and only a strictly better candidate replaces the
/// current best, so identical venue states always yield the identical
/// opportunity.
pub struct OpportunitySearchEngine {
    config: SearchConfig,
}

impl OpportunitySearchEngine {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn search<A: VenueQuoteAdapter + ?Sized>(&self, adapter: &A, params: SearchParams) -> ArbResult<SearchReport> {
        if params.max_amount_in.is_zero() {
            return Err(ArbError::InvalidAmount("max amount in must be positive".to_string()));
        }

        let mut run = SearchRun::new(&self.config, adapter, params);
        let amounts = self.config.trial_amounts(params.max_amount_in);

        let mut truncated = stop_on_budget(run.two_leg_routes(&amounts))?;
        if !truncated && params.triangle_enabled {
            truncated = stop_on_budget(run.triangle_routes(&amounts))?;
        }
        if truncated {
            warn!("Search work budget exhausted after {} quotes, keeping best candidate so far", run.budget.used());
        }

        let report = run.finish(truncated);
        debug!(
            "Search done: candidates={}, quotes={}, unavailable={}, valid={}, profit={}",
            report.candidates_evaluated,
            report.quotes_used,
            report.unavailable_quotes,
            report.opportunity.is_valid,
            report.opportunity.expected_profit
        );
        Ok(report)
    }
}

/// Budget exhaustion ends the enumeration without failing the search.
fn stop_on_budget(result: ArbResult<()>) -> ArbResult<bool> {
    match result {
        Ok(()) => Ok(false),
        Err(ArbError::WorkBudgetExceeded { .. }) => Ok(true),
        Err(e) => Err(e),
    }
}

struct Candidate {
    pair: TokenPair,
    amount_in: U256,
    legs: Vec<VenueSelection>,
    quotes: Vec<U256>,
    min_outs: Vec<U256>,
    gas: u64,
    net_profit: U256,
    is_valid: bool,
}

impl Candidate {
    fn outranks(&self, other: &Candidate) -> bool {
        (self.is_valid, self.net_profit) > (other.is_valid, other.net_profit)
    }
}

struct SearchRun<'a, A: ?Sized> {
    config: &'a SearchConfig,
    adapter: &'a A,
    costs: CostModel,
    budget: WorkBudget,
    candidates_evaluated: u64,
    unavailable_quotes: u64,
    best: Option<Candidate>,
}

impl<'a, A: VenueQuoteAdapter + ?Sized> SearchRun<'a, A> {
    fn new(config: &'a SearchConfig, adapter: &'a A, params: SearchParams) -> Self {
        Self {
            config,
            adapter,
            costs: params.costs,
            budget: params.budget,
            candidates_evaluated: 0,
            unavailable_quotes: 0,
            best: None,
        }
    }

    /// One budgeted quote. An unavailable venue yields `None` and the caller
    /// prunes every route extending that leg.
    fn quote(&mut self, token_in: Address, token_out: Address, amount_in: U256, selection: VenueSelection) -> ArbResult<Option<U256>> {
        self.budget.charge(1)?;
        match self.adapter.quote(token_in, token_out, amount_in, selection) {
            Ok(amount_out) => Ok(Some(amount_out)),
            Err(e) => {
                trace!("Quote {} {} -> {} unavailable: {}", selection, token_in, token_out, e);
                self.unavailable_quotes += 1;
                Ok(None)
            }
        }
    }

    fn consider(&mut self, pair: TokenPair, amount_in: U256, legs: &[VenueSelection], quotes: &[U256], gas: u64) {
        self.candidates_evaluated += 1;
        let Some(&final_output) = quotes.last() else {
            return;
        };
        let Some(net_profit) = self.costs.net_profit(amount_in, final_output, gas) else {
            return;
        };

        let min_outs: Vec<U256> = quotes.iter().map(|quote| apply_slippage(*quote, self.config.slippage_bps)).collect();
        let threshold = self.config.min_profit_threshold;
        let worst_case = min_outs.last().and_then(|min_out| self.costs.net_profit(amount_in, *min_out, gas));
        let is_valid = net_profit > threshold && worst_case.is_some_and(|profit| profit > threshold);

        let candidate = Candidate { pair, amount_in, legs: legs.to_vec(), quotes: quotes.to_vec(), min_outs, gas, net_profit, is_valid };
        if self.best.as_ref().is_none_or(|best| candidate.outranks(best)) {
            self.best = Some(candidate);
        }
    }

    /// base -> B -> base, the first leg quote reused across every exit venue.
    fn two_leg_routes(&mut self, amounts: &[U256]) -> ArbResult<()> {
        let config = self.config;
        let base = config.base_token;
        for token_out in config.counter_tokens() {
            let pair = TokenPair::direct(base, token_out);
            for &amount_in in amounts {
                for &sel_in in &config.selections {
                    let Some(out_1) = self.quote(base, token_out, amount_in, sel_in)? else {
                        continue;
                    };
                    for &sel_out in &config.selections {
                        let Some(out_2) = self.quote(token_out, base, out_1, sel_out)? else {
                            continue;
                        };
                        self.consider(pair, amount_in, &[sel_in, sel_out], &[out_1, out_2], config.two_leg_gas);
                    }
                }
            }
        }
        Ok(())
    }

    /// base -> I -> B -> base with I != B, partial quotes reused per prefix.
    fn triangle_routes(&mut self, amounts: &[U256]) -> ArbResult<()> {
        let config = self.config;
        let base = config.base_token;
        for intermediate in config.counter_tokens() {
            for &amount_in in amounts {
                for &sel_1 in &config.selections {
                    let Some(out_1) = self.quote(base, intermediate, amount_in, sel_1)? else {
                        continue;
                    };
                    for token_out in config.counter_tokens().filter(|token| *token != intermediate) {
                        let pair = TokenPair::triangle(base, intermediate, token_out);
                        for &sel_2 in &config.selections {
                            let Some(out_2) = self.quote(intermediate, token_out, out_1, sel_2)? else {
                                continue;
                            };
                            for &sel_3 in &config.selections {
                                let Some(out_3) = self.quote(token_out, base, out_2, sel_3)? else {
                                    continue;
                                };
                                self.consider(pair, amount_in, &[sel_1, sel_2, sel_3], &[out_1, out_2, out_3], config.triangle_gas);
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn finish(self, truncated: bool) -> SearchReport {
        let opportunity = match self.best {
            Some(best) => {
                let mut opportunity = ArbitrageOpportunity {
                    token_in: best.pair.token_in,
                    token_out: best.pair.token_out,
                    token_intermediate: best.pair.token_intermediate,
                    amount_in: best.amount_in,
                    is_triangle: best.legs.len() == 3,
                    legs: best.legs,
                    quoted_out_per_leg: best.quotes,
                    min_out_per_leg: best.min_outs,
                    expected_profit: best.net_profit,
                    gas_cost_estimate: best.gas,
                    is_valid: best.is_valid,
                    route_hash: Default::default(),
                };
                opportunity.route_hash = opportunity.compute_route_hash();
                opportunity
            }
            None => ArbitrageOpportunity::none(self.config.base_token),
        };

        SearchReport {
            opportunity,
            candidates_evaluated: self.candidates_evaluated,
            quotes_used: self.budget.used(),
            unavailable_quotes: self.unavailable_quotes,
            truncated,
        }
    }
}
