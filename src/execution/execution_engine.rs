use super::flash_lender::FlashLender;
use super::request::{ArbitrageExecutionRequest, ExecutionReceipt};
use super::unit_of_work::UnitOfWork;
use crate::access::CallContext;
use crate::errors::{ArbError, ArbResult};
use crate::state::StateLedger;
use crate::state::ledger::ExecutionCommit;
use crate::venues::VenueBackend;
use alloy_primitives::{Address, U256};
use tracing::{info, warn};

/// ExecutionEngine runs one request as an all-or-nothing unit.
///
/// Order of checks: deadline, route re-validation, capital (rate limiter and
/// borrow when own balance does not cover the input), legs with per-leg
/// minimum output, repayment, realized profit. Venue state, lender and ledger
/// are only written after every check passed. Authorization happens before
/// the engine is reached.
pub struct ExecutionEngine<'a, V: VenueBackend> {
    base_token: Address,
    ledger: &'a mut StateLedger,
    venues: &'a mut V,
    lender: &'a mut FlashLender,
}

impl<'a, V: VenueBackend> ExecutionEngine<'a, V> {
    pub fn new(base_token: Address, ledger: &'a mut StateLedger, venues: &'a mut V, lender: &'a mut FlashLender) -> Self {
        Self { base_token, ledger, venues, lender }
    }

    /// Executes `request`, requiring at least `min_net_profit` after gas.
    pub fn execute(self, ctx: &CallContext, request: &ArbitrageExecutionRequest, min_net_profit: U256) -> ArbResult<ExecutionReceipt> {
        let route_hash = request.route_hash();
        match self.try_execute(ctx, request, min_net_profit) {
            Ok(receipt) => {
                info!(
                    "Executed route {}: amount_in={}, realized_profit={}, borrowed={}, triangle={}",
                    route_hash, receipt.amount_in, receipt.realized_profit, receipt.borrowed, receipt.is_triangle
                );
                Ok(receipt)
            }
            Err(e) => {
                warn!("Execution of route {} rolled back: {}", route_hash, e);
                Err(e)
            }
        }
    }

    fn try_execute(mut self, ctx: &CallContext, request: &ArbitrageExecutionRequest, min_net_profit: U256) -> ArbResult<ExecutionReceipt> {
        if ctx.timestamp > request.deadline {
            return Err(ArbError::DeadlineExpired { deadline: request.deadline, now: ctx.timestamp });
        }
        self.validate_route(request)?;

        let premium_bps = self.ledger.config().flash_premium_bps;
        let balance_before = self.ledger.balance();
        let mut unit = UnitOfWork::begin(&*self.venues, &*self.lender, self.base_token, balance_before);

        let borrowed = !(request.use_own_liquidity_first && balance_before >= request.amount_in);
        if borrowed {
            self.ledger.rate_limiter().check(&ctx.caller, ctx.timestamp)?;
            unit.borrow(request.amount_in, premium_bps)?;
        }

        let tokens = request.route_tokens();
        let mut amount = request.amount_in;
        for (index, (selection, min_out)) in request.legs.iter().zip(&request.min_out_per_leg).enumerate() {
            amount = unit.swap(index + 1, tokens[index], tokens[index + 1], amount, *selection, *min_out)?;
        }
        let final_output = amount;
        let premium_paid = unit.repay()?;

        let balance_after = unit.base_balance();
        let gas_cost = U256::from(request.gas_cost_estimate).saturating_mul(request.gas_price_hint);
        let required = min_net_profit.saturating_add(gas_cost);
        let realized_profit = balance_after
            .checked_sub(balance_before)
            .filter(|realized| *realized >= required)
            .ok_or(ArbError::InsufficientRealizedProfit { realized: balance_after.saturating_sub(balance_before), required })?;

        let (venues, lender, balance_after) = unit.into_parts();
        *self.venues = venues;
        *self.lender = lender;
        self.ledger.commit_execution(ExecutionCommit {
            caller: ctx.caller,
            timestamp: ctx.timestamp,
            route_hash: request.route_hash(),
            amount_in: request.amount_in,
            realized_profit,
            premium_paid,
            borrowed,
            is_triangle: request.is_triangle,
            recipient: request.recipient,
            balance_after,
        });

        Ok(ExecutionReceipt {
            route_hash: request.route_hash(),
            amount_in: request.amount_in,
            final_output,
            realized_profit,
            borrowed,
            premium_paid,
            is_triangle: request.is_triangle,
            recipient: request.recipient,
        })
    }

    fn validate_route(&self, request: &ArbitrageExecutionRequest) -> ArbResult<()> {
        if request.amount_in.is_zero() {
            return Err(ArbError::InvalidAmount("amount in must be positive".to_string()));
        }
        let expected_legs = if request.is_triangle { 3 } else { 2 };
        if request.legs.len() != expected_legs {
            return Err(ArbError::InvalidRoute(format!("expected {} legs, got {}", expected_legs, request.legs.len())));
        }
        if request.min_out_per_leg.len() != request.legs.len() {
            return Err(ArbError::InvalidRoute(format!(
                "{} legs but {} minimum outputs",
                request.legs.len(),
                request.min_out_per_leg.len()
            )));
        }
        if let Some(selection) = request.legs.iter().find(|selection| !selection.is_valid()) {
            return Err(ArbError::InvalidRoute(format!("invalid venue selection {selection}")));
        }
        if request.token_in != self.base_token {
            return Err(ArbError::InvalidRoute(format!("route must start at base token {}", self.base_token)));
        }
        if request.token_out == self.base_token {
            return Err(ArbError::InvalidRoute("route must leave the base token".to_string()));
        }
        match (request.is_triangle, request.token_intermediate) {
            (true, None) => return Err(ArbError::InvalidRoute("triangle route without intermediate token".to_string())),
            (false, Some(_)) => return Err(ArbError::InvalidRoute("direct route with intermediate token".to_string())),
            (true, Some(intermediate)) if intermediate == self.base_token || intermediate == request.token_out => {
                return Err(ArbError::InvalidRoute(format!("intermediate token {intermediate} repeats a route token")));
            }
            _ => {}
        }
        if request.is_triangle && !self.ledger.config().triangle_arb_enabled {
            return Err(ArbError::InvalidRoute("triangle arbitrage is disabled".to_string()));
        }
        Ok(())
    }
}
