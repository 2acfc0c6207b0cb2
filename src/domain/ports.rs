use crate::domain::model::PaymentTerm;
use crate::domain::request::{OpenMode, RequestSet};
use crate::domain::response::ResponseSet;
use crate::utils::error::{EngineError, EngineResult, Result};

/// Contract required from the accounting engine's session manager.
///
/// Calls block until the engine answers. Implementations are not expected
/// to be shared between threads; each query creates its own.
pub trait AccountingEngine {
    fn open_connection(&mut self, app_id: &str, app_name: &str) -> EngineResult<()>;

    fn close_connection(&mut self) -> EngineResult<()>;

    fn begin_session(&mut self, company_file: &str, open_mode: OpenMode) -> EngineResult<()>;

    fn end_session(&mut self) -> EngineResult<()>;

    /// New, empty message set for the given SDK version.
    fn create_request_set(
        &mut self,
        country: &str,
        major_version: u16,
        minor_version: u16,
    ) -> RequestSet {
        RequestSet::new(country, major_version, minor_version)
    }

    fn do_requests(&mut self, requests: &RequestSet) -> EngineResult<Option<ResponseSet>>;
}

/// Source of fresh engine handles, one per query.
pub trait EngineProvider {
    type Engine: AccountingEngine;

    fn create_engine(&self) -> EngineResult<Self::Engine>;
}

impl<E, F> EngineProvider for F
where
    E: AccountingEngine,
    F: Fn() -> std::result::Result<E, EngineError>,
{
    type Engine = E;

    fn create_engine(&self) -> EngineResult<E> {
        self()
    }
}

pub trait Pipeline {
    /// Talk to the engine and return its raw response.
    fn extract(&self) -> Result<Option<ResponseSet>>;

    /// Map the raw response into term records. Never fails; unusable parts
    /// of the response are skipped.
    fn transform(&self, responses: Option<&ResponseSet>) -> Vec<PaymentTerm>;
}
