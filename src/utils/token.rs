use crate::utils::constants::MainnetToken;
use alloy_primitives::utils::Unit;
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

fn default_decimals() -> u8 {
    18
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Token {
    address: Address,
    #[serde(default = "default_decimals")]
    decimals: u8,
    #[serde(default)]
    symbol: Option<String>,
}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address.hash(state)
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.get_address()
    }
}

impl Eq for Token {}

impl Ord for Token {
    fn cmp(&self, other: &Self) -> Ordering {
        self.address.cmp(&other.get_address())
    }
}

impl PartialOrd for Token {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Token {
    pub fn new(address: Address) -> Token {
        Token { address, decimals: 18, ..Token::default() }
    }

    pub fn new_with_data(address: Address, symbol: Option<String>, decimals: Option<u8>) -> Token {
        Token { address, symbol, decimals: decimals.unwrap_or(18) }
    }

    pub fn get_symbol(&self) -> String {
        self.symbol.clone().unwrap_or(self.address.to_string())
    }

    pub fn get_exp(&self) -> U256 {
        if self.decimals == 18 { Unit::ETHER.wei() } else { U256::from(10).pow(U256::from(self.decimals)) }
    }

    pub fn get_address(&self) -> Address {
        self.address
    }

    /// Lossy conversion for log output only. Never used in profit arithmetic.
    pub fn to_float(&self, value: U256) -> f64 {
        if self.decimals == 0 {
            return u64::try_from(value).map(|v| v as f64).unwrap_or(f64::MAX);
        }
        let (div, rem) = value.div_rem(self.get_exp());
        match (u64::try_from(div), u128::try_from(rem)) {
            (Ok(div), Ok(rem)) => div as f64 + (rem as f64) / 10f64.powi(self.decimals as i32),
            _ => f64::MAX,
        }
    }
}

/// The default eight-token universe of the V2 deployment, base token first.
pub fn default_token_universe() -> Vec<Token> {
    let entry = |address: Address, symbol: &str, decimals: u8| {
        Token::new_with_data(address, Some(symbol.to_string()), Some(decimals))
    };
    vec![
        entry(MainnetToken::WETH, "WETH", 18),
        entry(MainnetToken::USDC, "USDC", 6),
        entry(MainnetToken::USDT, "USDT", 6),
        entry(MainnetToken::DAI, "DAI", 18),
        entry(MainnetToken::WBTC, "WBTC", 8),
        entry(MainnetToken::LINK, "LINK", 18),
        entry(MainnetToken::UNI, "UNI", 18),
        entry(MainnetToken::AAVE, "AAVE", 18),
    ]
}
