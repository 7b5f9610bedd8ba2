//! End-to-end scenarios through the public bot interface.

use crate::execution::PolicyLimits;
use crate::utils::constants::{MainnetToken, WETH};
use crate::venues::FixedRatePool;
use crate::{
    ArbError, ArbitrageBot, ArbitrageExecutionRequest, CallContext, ContractConfig, FlashLender, SearchConfig, StateLedger, Venue,
    VenueBook, VenueSelection,
};
use alloy_primitives::{Address, U256};

const ETHER: u64 = 1_000_000_000_000_000_000;
const GWEI: u64 = 1_000_000_000;
const T0: u64 = 1_700_000_000;

fn ether(n: u64) -> U256 {
    U256::from(n) * U256::from(ETHER)
}

fn operator() -> Address {
    Address::repeat_byte(0x0a)
}

fn ctx(timestamp: u64) -> CallContext {
    CallContext::new(operator(), timestamp, U256::from(15 * GWEI))
}

fn stranger(timestamp: u64) -> CallContext {
    CallContext::new(Address::repeat_byte(0x0b), timestamp, U256::from(15 * GWEI))
}

/// Every venue quotes 1050 DAI per WETH both ways.
fn spot_equal_book() -> VenueBook {
    let mut book = VenueBook::new();
    for venue in [Venue::UniswapV2, Venue::Sushiswap] {
        book.add_pool(FixedRatePool::new(venue, WETH, MainnetToken::DAI, (1_050, 1), (1, 1_050)));
    }
    book
}

/// UniswapV2 sells 1050 DAI per WETH; Sushiswap buys 1050 DAI back for 1.02 WETH.
fn seeded_book() -> VenueBook {
    let mut book = VenueBook::new();
    book.add_pool(FixedRatePool::new(Venue::UniswapV2, WETH, MainnetToken::DAI, (1_050, 1), (1, 1_050)));
    book.add_pool(FixedRatePool::new(Venue::Sushiswap, WETH, MainnetToken::DAI, (1_000, 1), (102, 105_000)));
    book
}

fn bot_with(book: VenueBook) -> ArbitrageBot {
    let ledger = StateLedger::new(ContractConfig::new(operator()), PolicyLimits::default()).unwrap();
    ArbitrageBot::new(SearchConfig::default(), book, FlashLender::new(ether(1_000)), ledger)
}

fn borrowed_request(bot: &ArbitrageBot, now: u64) -> ArbitrageExecutionRequest {
    let report = bot.search(&ctx(now), ether(1)).unwrap();
    assert!(report.found());
    ArbitrageExecutionRequest::from_opportunity(&report.opportunity, now + 60)
        .with_gas_price_hint(U256::from(15 * GWEI))
        .with_own_liquidity_first(false)
}

#[test]
fn test_spot_equal_prices_find_nothing() -> eyre::Result<()> {
    let bot = bot_with(spot_equal_book());
    let report = bot.search(&ctx(T0), ether(1))?;
    assert!(!report.opportunity.is_valid);
    assert!(!report.truncated);
    Ok(())
}

#[test]
fn test_seeded_mispricing_is_found_with_exact_profit() -> eyre::Result<()> {
    let bot = bot_with(seeded_book());
    let opportunity = bot.search(&ctx(T0), ether(1))?.opportunity;

    assert!(opportunity.is_valid);
    assert_eq!(opportunity.token_out, MainnetToken::DAI);
    assert_eq!(opportunity.legs, vec![VenueSelection::plain(Venue::UniswapV2), VenueSelection::plain(Venue::Sushiswap)]);
    assert_eq!(opportunity.quoted_out_per_leg, vec![ether(1_050), U256::from(1_020_000_000_000_000_000u64)]);
    assert_eq!(opportunity.expected_profit, U256::from(15_000_000_000_000_000u64));

    // expected = final output - amount in - gas x gas price - premium
    let gas_cost = U256::from(opportunity.gas_cost_estimate) * U256::from(15 * GWEI);
    let premium = opportunity.amount_in * U256::from(5u64) / U256::from(10_000u64);
    assert_eq!(opportunity.expected_profit, opportunity.final_quoted_output() - opportunity.amount_in - gas_cost - premium);
    assert!(opportunity.expected_profit > bot.search_config().min_profit_threshold);
    Ok(())
}

#[test]
fn test_search_is_reproducible() -> eyre::Result<()> {
    let mut bot = bot_with(seeded_book());
    bot.set_triangle_arb_enabled(&ctx(T0), true)?;
    let first = bot.search(&ctx(T0), ether(1))?;
    let second = bot.search(&ctx(T0), ether(1))?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_auto_execute_commits_profit() -> eyre::Result<()> {
    let mut bot = bot_with(seeded_book());
    let outcome = bot.auto_execute(&ctx(T0), ether(1), 0)?;
    let receipt = outcome.receipt().cloned().ok_or_else(|| eyre::eyre!("expected an execution"))?;

    assert!(receipt.borrowed);
    assert_eq!(receipt.realized_profit, U256::from(19_500_000_000_000_000u64));
    assert_eq!(receipt.route_hash, outcome.report().opportunity.route_hash);

    let status = bot.status(&ctx(T0));
    assert_eq!(status.balance, receipt.realized_profit);
    assert_eq!(status.stats.total_trades, 1);
    assert_eq!(status.stats.total_volume, ether(1));
    assert_eq!(status.stats.total_profit, receipt.realized_profit);
    assert_eq!(status.policy.borrowed_executions_today, 1);
    assert_eq!(status.policy.remaining_cooldown, 300);
    assert!(!status.can_execute_borrowed);
    Ok(())
}

#[test]
fn test_price_move_before_execution_rolls_back() -> eyre::Result<()> {
    let mut bot = bot_with(seeded_book());
    bot.deposit(&ctx(T0), ether(2))?;
    let request = borrowed_request(&bot, T0);

    // leg 2's venue falls back to spot
    bot.venues_mut().add_pool(FixedRatePool::new(Venue::Sushiswap, WETH, MainnetToken::DAI, (1_000, 1), (1, 1_050)));
    let before = bot.status(&ctx(T0));

    let err = bot.execute_specific(&ctx(T0), &request, U256::ZERO).unwrap_err();
    assert!(matches!(err, ArbError::SlippageExceeded { leg: 2, .. }));

    assert_eq!(bot.status(&ctx(T0)), before);
    assert_eq!(bot.lender().liquidity(), ether(1_000));
    assert_eq!(bot.drain_events().len(), 1); // the deposit only
    Ok(())
}

#[test]
fn test_min_net_profit_is_never_undercut() -> eyre::Result<()> {
    let mut bot = bot_with(seeded_book());
    let request = borrowed_request(&bot, T0).with_min_net_profit(U256::from(1_000u64));
    let before = bot.status(&ctx(T0));

    // 0.0195 realized - 0.0045 gas = 0.015 net, below the caller's 0.02
    let err = bot.execute_specific(&ctx(T0), &request, U256::from(20_000_000_000_000_000u64)).unwrap_err();
    assert!(matches!(err, ArbError::InsufficientRealizedProfit { .. }));
    assert_eq!(bot.status(&ctx(T0)), before);

    // the request's own floor applies when it is the stricter one
    let strict = request.with_min_net_profit(U256::from(20_000_000_000_000_000u64));
    assert!(matches!(bot.execute_specific(&ctx(T0), &strict, U256::ZERO), Err(ArbError::InsufficientRealizedProfit { .. })));

    let receipt = bot.execute_specific(&ctx(T0), &borrowed_request(&bot, T0), U256::from(15_000_000_000_000_000u64))?;
    assert_eq!(receipt.realized_profit, U256::from(19_500_000_000_000_000u64));
    Ok(())
}

#[test]
fn test_non_operator_cannot_deposit() {
    let mut bot = bot_with(seeded_book());
    assert_eq!(bot.deposit(&stranger(T0), ether(1)), Err(ArbError::NotOperator(stranger(T0).caller)));
    assert_eq!(bot.status(&ctx(T0)).balance, U256::ZERO);
    assert!(bot.drain_events().is_empty());
}

#[test]
fn test_non_operator_mutations_all_fail() -> eyre::Result<()> {
    let mut bot = bot_with(seeded_book());
    bot.deposit(&ctx(T0), ether(1))?;
    bot.drain_events();
    let request = borrowed_request(&bot, T0);
    let before = bot.status(&ctx(T0));
    let denied = ArbError::NotOperator(stranger(T0).caller);
    let s = stranger(T0);

    assert_eq!(bot.withdraw(&s, ether(1)), Err(denied.clone()));
    assert_eq!(bot.auto_execute(&s, ether(1), 0), Err(denied.clone()));
    assert_eq!(bot.execute_specific(&s, &request, U256::ZERO), Err(denied.clone()));
    assert_eq!(bot.set_triangle_arb_enabled(&s, true), Err(denied.clone()));
    assert_eq!(bot.set_gas_price_hint(&s, U256::from(1u64)), Err(denied.clone()));
    assert_eq!(bot.set_flash_premium_bps(&s, 1), Err(denied.clone()));
    assert_eq!(bot.set_daily_limit(&s, 1), Err(denied.clone()));
    assert_eq!(bot.set_cooldown(&s, 1), Err(denied.clone()));
    assert_eq!(bot.pause(&s), Err(denied.clone()));
    assert_eq!(bot.unpause(&s), Err(denied.clone()));
    assert_eq!(bot.transfer_operator(&s, s.caller), Err(denied));

    assert_eq!(bot.status(&ctx(T0)), before);
    assert!(bot.drain_events().is_empty());
    Ok(())
}

#[test]
fn test_daily_limit_caps_borrowed_executions() -> eyre::Result<()> {
    let mut bot = bot_with(seeded_book());
    assert_eq!(bot.ledger().rate_limiter().limits().daily_limit, 150);

    let mut now = T0;
    for _ in 0..150 {
        let request = borrowed_request(&bot, now);
        let receipt = bot.execute_specific(&ctx(now), &request, U256::ZERO)?;
        assert!(receipt.borrowed);
        now += 300;
    }

    let request = borrowed_request(&bot, now);
    let err = bot.execute_specific(&ctx(now), &request, U256::ZERO).unwrap_err();
    assert_eq!(err, ArbError::DailyLimitExceeded { used: 150, limit: 150 });
    assert_eq!(bot.status(&ctx(now)).stats.total_trades, 150);

    // own liquidity is not rate limited
    let own = request.with_own_liquidity_first(true);
    assert!(!bot.execute_specific(&ctx(now), &own, U256::ZERO)?.borrowed);

    // one day after the first borrow a slot frees up
    let request = borrowed_request(&bot, T0 + 86_400);
    assert!(bot.execute_specific(&ctx(T0 + 86_400), &request, U256::ZERO)?.borrowed);
    Ok(())
}

#[test]
fn test_cooldown_separates_borrowed_executions() -> eyre::Result<()> {
    let mut bot = bot_with(seeded_book());
    let request = borrowed_request(&bot, T0);
    bot.execute_specific(&ctx(T0), &request, U256::ZERO)?;

    let request = borrowed_request(&bot, T0 + 100);
    assert_eq!(bot.execute_specific(&ctx(T0 + 100), &request, U256::ZERO), Err(ArbError::CooldownActive { remaining_secs: 200 }));
    let request = borrowed_request(&bot, T0 + 300);
    assert!(bot.execute_specific(&ctx(T0 + 300), &request, U256::ZERO).is_ok());
    Ok(())
}

#[test]
fn test_triangle_toggle_takes_effect_on_next_search() -> eyre::Result<()> {
    // only WETH -> DAI -> LINK -> WETH pays
    let mut book = VenueBook::new();
    book.add_pool(FixedRatePool::new(Venue::UniswapV2, WETH, MainnetToken::DAI, (1_000, 1), (1, 1_050)));
    book.add_pool(FixedRatePool::new(Venue::UniswapV2, MainnetToken::DAI, MainnetToken::LINK, (1, 100), (100, 1)));
    book.add_pool(FixedRatePool::new(Venue::UniswapV2, WETH, MainnetToken::LINK, (9, 1), (1, 9)));
    let mut bot = bot_with(book);

    let report = bot.search(&ctx(T0), ether(1))?;
    assert!(!report.opportunity.is_triangle);
    assert!(!report.found());

    bot.set_triangle_arb_enabled(&ctx(T0), true)?;
    let opportunity = bot.search(&ctx(T0), ether(1))?.opportunity;
    assert!(opportunity.is_valid);
    assert!(opportunity.is_triangle);
    assert_eq!(opportunity.token_intermediate, Some(MainnetToken::DAI));
    assert_eq!(opportunity.token_out, MainnetToken::LINK);

    let receipt = bot.execute_specific(&ctx(T0), &ArbitrageExecutionRequest::from_opportunity(&opportunity, T0), U256::ZERO)?;
    assert!(receipt.is_triangle);
    assert_eq!(bot.status(&ctx(T0)).stats.triangle_arb_count, 1);

    bot.set_triangle_arb_enabled(&ctx(T0), false)?;
    assert!(!bot.search(&ctx(T0), ether(1))?.opportunity.is_triangle);
    Ok(())
}
