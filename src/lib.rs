pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliArgs;

pub use crate::adapters::memory::{MemoryCompany, MemoryEngine};
pub use crate::config::GatewayConfig;
pub use crate::core::{
    pipeline::StandardTermsPipeline,
    reader::{query_all_terms, TermsReader},
    session::SessionGateway,
};
pub use crate::domain::model::{NewStandardTerm, PaymentTerm, TermsQueryOutcome};
pub use crate::utils::error::{EngineError, Result, TermsError};
