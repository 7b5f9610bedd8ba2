use alloy_primitives::{Address, U256};
use arb_engine::logic::{CostModel, OpportunitySearchEngine, SearchParams};
use arb_engine::utils::constants::{MainnetToken, WETH};
use arb_engine::utils::default_token_universe;
use arb_engine::venues::{ConcentratedLiquidityPool, ConstantProductPool, WeightedPool};
use arb_engine::{SearchConfig, Token, Venue, VenueBook, WorkBudget};
use criterion::{Criterion, criterion_group, criterion_main};
use lazy_static::lazy_static;

lazy_static! {
    static ref TOKENS: Vec<Token> = default_token_universe();
    static ref BOOK: VenueBook = build_book();
    static ref ENGINE: OpportunitySearchEngine = OpportunitySearchEngine::new(SearchConfig::default());
}

/// Units of each token one WETH buys.
fn weth_price(token: Address) -> u64 {
    match token {
        t if t == MainnetToken::WBTC => 1,
        t if t == MainnetToken::LINK => 200,
        t if t == MainnetToken::UNI => 400,
        t if t == MainnetToken::AAVE => 20,
        _ => 3_000,
    }
}

fn build_book() -> VenueBook {
    let mut book = VenueBook::new();
    let weth_reserve = U256::from(20_000u64) * U256::from(10u64).pow(U256::from(18u64));
    for token in TOKENS.iter().filter(|token| token.get_address() != WETH) {
        let token_reserve = U256::from(20_000u64 * weth_price(token.get_address())) * token.get_exp();
        // sushiswap quotes slightly off the others
        let sushi_reserve = token_reserve * U256::from(1_003u64) / U256::from(1_000u64);

        book.add_pool(ConstantProductPool::new(Venue::UniswapV2, WETH, token.get_address(), weth_reserve, token_reserve));
        book.add_pool(ConstantProductPool::new(Venue::Sushiswap, WETH, token.get_address(), weth_reserve, sushi_reserve));
        for fee_tier in [500, 3_000] {
            book.add_pool(ConcentratedLiquidityPool::from_reserves(WETH, token.get_address(), fee_tier, weth_reserve, token_reserve));
        }
        book.add_pool(WeightedPool::new(WETH, token.get_address(), weth_reserve, token_reserve, 50, 50));
    }

    let stables = [MainnetToken::USDC, MainnetToken::USDT, MainnetToken::DAI];
    for (i, token_a) in stables.iter().enumerate() {
        for token_b in &stables[i + 1..] {
            let reserve_a = U256::from(60_000_000u64) * token_exp(*token_a);
            let reserve_b = U256::from(60_000_000u64) * token_exp(*token_b);
            book.add_pool(ConstantProductPool::new(Venue::UniswapV2, *token_a, *token_b, reserve_a, reserve_b));
        }
    }
    book
}

fn token_exp(address: Address) -> U256 {
    TOKENS.iter().find(|token| token.get_address() == address).map(Token::get_exp).unwrap_or(U256::from(10u64).pow(U256::from(18u64)))
}

fn search(triangle_enabled: bool) -> eyre::Result<()> {
    let params = SearchParams {
        max_amount_in: U256::from(10u64).pow(U256::from(19u64)),
        costs: CostModel::new(U256::from(15_000_000_000u64), 5),
        triangle_enabled,
        budget: WorkBudget::unlimited(),
    };
    let report = ENGINE.search(&*BOOK, params)?;
    assert!(!report.truncated);
    Ok(())
}

fn benchmark_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(10);

    group.bench_function("two_leg", |b| b.iter(|| search(false)));
    group.bench_function("with_triangles", |b| b.iter(|| search(true)));
    group.finish();
}

criterion_group!(benches, benchmark_search);
criterion_main!(benches);
