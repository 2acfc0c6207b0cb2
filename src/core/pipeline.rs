use crate::config::GatewayConfig;
use crate::core::session::{SessionGateway, SessionStage};
use crate::core::walk::walk_standard_terms_query;
use crate::domain::model::PaymentTerm;
use crate::domain::ports::{AccountingEngine, EngineProvider, Pipeline};
use crate::domain::request::RequestSet;
use crate::domain::response::ResponseSet;
use crate::utils::error::{Result, TermsError};

/// One "list all standard terms" round trip against a fresh engine handle.
pub struct StandardTermsPipeline<P: EngineProvider> {
    provider: P,
    config: GatewayConfig,
}

impl<P: EngineProvider> StandardTermsPipeline<P> {
    pub fn new(provider: P, config: GatewayConfig) -> Self {
        Self { provider, config }
    }
}

pub fn build_standard_terms_query<E: AccountingEngine>(
    gateway: &mut SessionGateway<E>,
) -> RequestSet {
    let mut requests = gateway.create_request();
    requests.append_standard_terms_query();
    requests
}

impl<P: EngineProvider> Pipeline for StandardTermsPipeline<P> {
    fn extract(&self) -> Result<Option<ResponseSet>> {
        let engine = self
            .provider
            .create_engine()
            .map_err(|source| TermsError::Connection {
                stage: SessionStage::CreateEngine,
                source,
            })?;

        let mut gateway = SessionGateway::open(engine, &self.config)?;
        let requests = build_standard_terms_query(&mut gateway);
        let responses = gateway.send(&requests)?;
        gateway.close()?;

        tracing::debug!(
            responses = responses.as_ref().map(|set| set.responses().len()).unwrap_or(0),
            "Received response set"
        );
        Ok(responses)
    }

    fn transform(&self, responses: Option<&ResponseSet>) -> Vec<PaymentTerm> {
        walk_standard_terms_query(responses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{EngineCall, MemoryCompany, MemoryEngine, StoredTerm};
    use crate::domain::request::{OnError, Request};
    use crate::utils::error::{EngineError, EngineResult};

    #[test]
    fn test_build_query_holds_single_unfiltered_request() {
        let company = MemoryCompany::new();
        let mut gateway =
            SessionGateway::open(company.engine(), &GatewayConfig::default()).unwrap();

        let requests = build_standard_terms_query(&mut gateway);

        assert_eq!(requests.requests(), &[Request::StandardTermsQuery]);
        assert_eq!(requests.country(), "US");
        assert_eq!(requests.version(), (16, 0));
        assert_eq!(requests.on_error(), OnError::Continue);
    }

    #[test]
    fn test_extract_then_transform() {
        let company = MemoryCompany::with_terms(vec![
            StoredTerm::new("80000001-1234567890", "1", "Net 30").with_discount_days(10),
        ]);
        let pipeline = StandardTermsPipeline::new(company.provider(), GatewayConfig::default());

        let responses = pipeline.extract().unwrap();
        let terms = pipeline.transform(responses.as_ref());

        assert_eq!(terms, vec![PaymentTerm::new("80000001-1234567890", "1", "Net 30", 10)]);
        assert_eq!(
            company.calls(),
            vec![
                EngineCall::OpenConnection,
                EngineCall::BeginSession,
                EngineCall::DoRequests,
                EngineCall::EndSession,
                EngineCall::CloseConnection,
            ]
        );
    }

    #[test]
    fn test_provider_failure_is_connection_error() {
        let provider = || -> EngineResult<MemoryEngine> {
            Err(EngineError::new(0x8004_0154, "engine not registered"))
        };
        let pipeline = StandardTermsPipeline::new(provider, GatewayConfig::default());

        let err = pipeline.extract().unwrap_err();
        assert!(matches!(
            err,
            TermsError::Connection {
                stage: SessionStage::CreateEngine,
                ..
            }
        ));
    }

    #[test]
    fn test_teardown_failure_fails_extract() {
        let company = MemoryCompany::new();
        company.fail_on(EngineCall::EndSession, EngineError::new(0x8004_0400, "end failed"));
        let pipeline = StandardTermsPipeline::new(company.provider(), GatewayConfig::default());

        let err = pipeline.extract().unwrap_err();

        assert!(matches!(err, TermsError::Teardown { .. }));
        assert_eq!(company.calls().last(), Some(&EngineCall::CloseConnection));
    }
}
