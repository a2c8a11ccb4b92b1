pub mod budgets;
pub mod cli;
pub mod configuration;
pub mod providers;

pub use configuration::AiCommitConfig;
pub use providers::{ModelRoute, ProviderInfo, ProviderKind};
