pub mod config_loader;
pub mod constants;
pub mod token;

pub use config_loader::*;
pub use constants::*;
pub use token::{Token, default_token_universe};
