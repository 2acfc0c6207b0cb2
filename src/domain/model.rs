use crate::utils::error::TermsError;
use serde::{Deserialize, Serialize};

/// A standard payment term as read back from the company file.
///
/// Built only by the response walk; fields are read through accessors and
/// never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentTerm {
    external_id: String,
    revision_token: String,
    name: String,
    discount_days: i32,
}

impl PaymentTerm {
    pub fn new(
        external_id: impl Into<String>,
        revision_token: impl Into<String>,
        name: impl Into<String>,
        discount_days: i32,
    ) -> Self {
        Self {
            external_id: external_id.into(),
            revision_token: revision_token.into(),
            name: name.into(),
            discount_days,
        }
    }

    /// Engine-assigned ListID, stable across queries.
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    /// EditSequence; only meaningful for equality checks by the engine.
    pub fn revision_token(&self) -> &str {
        &self.revision_token
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn discount_days(&self) -> i32 {
        self.discount_days
    }
}

/// Fields for a StandardTermsAdd request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStandardTerm {
    pub name: String,
    pub is_active: bool,
    pub std_due_days: i32,
    pub std_discount_days: i32,
    pub discount_pct: f64,
}

impl NewStandardTerm {
    pub fn new(name: impl Into<String>, std_due_days: i32) -> Self {
        Self {
            name: name.into(),
            is_active: true,
            std_due_days,
            std_discount_days: 0,
            discount_pct: 0.0,
        }
    }

    pub fn with_discount(mut self, discount_days: i32, discount_pct: f64) -> Self {
        self.std_discount_days = discount_days;
        self.discount_pct = discount_pct;
        self
    }
}

/// Result of a full query run.
///
/// `terms` holds whatever was mapped before the run stopped. When `failure`
/// is set the list may be empty or partial even though terms exist in the
/// company file.
#[derive(Debug)]
pub struct TermsQueryOutcome {
    pub terms: Vec<PaymentTerm>,
    pub failure: Option<TermsError>,
}

impl TermsQueryOutcome {
    pub fn complete(terms: Vec<PaymentTerm>) -> Self {
        Self {
            terms,
            failure: None,
        }
    }

    pub fn degraded(terms: Vec<PaymentTerm>, failure: TermsError) -> Self {
        Self {
            terms,
            failure: Some(failure),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.failure.is_some()
    }
}
