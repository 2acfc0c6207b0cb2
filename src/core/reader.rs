use crate::config::GatewayConfig;
use crate::core::pipeline::StandardTermsPipeline;
use crate::domain::model::{PaymentTerm, TermsQueryOutcome};
use crate::domain::ports::{EngineProvider, Pipeline};

/// Runs a term pipeline and absorbs its failures.
///
/// [`TermsReader::query_all_terms`] never returns an error: failures are
/// logged and whatever was mapped so far (usually nothing) is returned, so an
/// empty list does not mean the company file has no terms. Use
/// [`TermsReader::query_all_terms_detailed`] to see the failure.
pub struct TermsReader<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> TermsReader<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn query_all_terms(&self) -> Vec<PaymentTerm> {
        self.query_all_terms_detailed().terms
    }

    pub fn query_all_terms_detailed(&self) -> TermsQueryOutcome {
        tracing::info!("Querying standard terms");

        let responses = match self.pipeline.extract() {
            Ok(responses) => responses,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    category = ?e.category(),
                    "Standard terms query failed"
                );
                return TermsQueryOutcome::degraded(Vec::new(), e);
            }
        };

        let terms = self.pipeline.transform(responses.as_ref());
        tracing::info!(count = terms.len(), "Standard terms query completed");
        TermsQueryOutcome::complete(terms)
    }
}

impl<E: EngineProvider> TermsReader<StandardTermsPipeline<E>> {
    pub fn with_provider(provider: E, config: GatewayConfig) -> Self {
        Self::new(StandardTermsPipeline::new(provider, config))
    }
}

/// Queries every standard term with the default gateway settings.
pub fn query_all_terms<E: EngineProvider>(provider: E) -> Vec<PaymentTerm> {
    TermsReader::with_provider(provider, GatewayConfig::default()).query_all_terms()
}
