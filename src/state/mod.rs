/// State Layer
///
/// The single owned state object of the engine: lifetime statistics,
/// operator configuration, per-caller policy state, balance and the event
/// journal consumed by the dashboard's history view.
pub mod events;
pub mod ledger;

pub use events::{ConfigSetting, EngineEvent};
pub use ledger::{ContractConfig, ContractStats, DEFAULT_FLASH_PREMIUM_BPS, StateLedger};
