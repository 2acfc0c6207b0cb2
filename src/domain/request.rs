use crate::domain::model::NewStandardTerm;
use serde::{Deserialize, Serialize};

/// What the engine does with the remaining requests of a set after one fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnError {
    #[default]
    Stop,
    Continue,
}

/// How the company file is opened when a session begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenMode {
    #[default]
    DontCare,
    SingleUser,
    MultiUser,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListDelType {
    StandardTerms,
    DateDrivenTerms,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    /// Unfiltered: every standard term in the company file.
    StandardTermsQuery,
    StandardTermsAdd(NewStandardTerm),
    ListDel {
        list_del_type: ListDelType,
        list_id: String,
    },
}

impl Request {
    pub fn name(&self) -> &'static str {
        match self {
            Request::StandardTermsQuery => "StandardTermsQueryRq",
            Request::StandardTermsAdd(_) => "StandardTermsAddRq",
            Request::ListDel { .. } => "ListDelRq",
        }
    }
}

/// A message set: requests sent to the engine in one round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSet {
    country: String,
    major_version: u16,
    minor_version: u16,
    on_error: OnError,
    requests: Vec<Request>,
}

impl RequestSet {
    pub fn new(country: impl Into<String>, major_version: u16, minor_version: u16) -> Self {
        Self {
            country: country.into(),
            major_version,
            minor_version,
            on_error: OnError::default(),
            requests: Vec::new(),
        }
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn version(&self) -> (u16, u16) {
        (self.major_version, self.minor_version)
    }

    pub fn on_error(&self) -> OnError {
        self.on_error
    }

    pub fn set_on_error(&mut self, on_error: OnError) {
        self.on_error = on_error;
    }

    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn append_standard_terms_query(&mut self) {
        self.requests.push(Request::StandardTermsQuery);
    }

    pub fn append_standard_terms_add(&mut self, term: NewStandardTerm) {
        self.requests.push(Request::StandardTermsAdd(term));
    }

    pub fn append_list_del(&mut self, list_del_type: ListDelType, list_id: impl Into<String>) {
        self.requests.push(Request::ListDel {
            list_del_type,
            list_id: list_id.into(),
        });
    }
}
