pub mod maintenance;
pub mod pipeline;
pub mod reader;
pub mod session;
pub mod walk;

pub use crate::domain::model::{PaymentTerm, TermsQueryOutcome};
pub use crate::domain::ports::{AccountingEngine, EngineProvider, Pipeline};
pub use crate::utils::error::Result;
