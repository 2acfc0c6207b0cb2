//! In-memory stand-in for the accounting engine.
//!
//! A [`MemoryCompany`] plays the company file; every [`MemoryEngine`] handed
//! out by it is an independent session manager over the same data. Used by
//! the test suites and by the command-line tool when it runs against a JSON
//! snapshot.

use crate::domain::model::NewStandardTerm;
use crate::domain::ports::AccountingEngine;
use crate::domain::request::{ListDelType, OnError, OpenMode, Request, RequestSet};
use crate::domain::response::{
    ListDelRet, Response, ResponseDetail, ResponseSet, ResponseType, Scalar, StandardTermsRet,
    StatusSeverity,
};
use crate::utils::error::{EngineError, EngineResult, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub const ALREADY_CONNECTED: u32 = 0x8004_0401;
pub const NOT_CONNECTED: u32 = 0x8004_0402;
pub const SESSION_ALREADY_ACTIVE: u32 = 0x8004_0403;
pub const NO_ACTIVE_SESSION: u32 = 0x8004_0404;

pub const STATUS_NO_MATCH: i32 = 1;
pub const STATUS_NAME_IN_USE: i32 = 3100;
pub const STATUS_OBJECT_NOT_FOUND: i32 = 3120;
pub const STATUS_INVALID_FIELD: i32 = 3180;

const FIRST_LIST_SEQUENCE: u32 = 0x8000_0001;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTerm {
    pub list_id: String,
    pub edit_sequence: String,
    pub name: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub std_due_days: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub std_discount_days: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_pct: Option<f64>,
}

fn default_active() -> bool {
    true
}

impl StoredTerm {
    pub fn new(
        list_id: impl Into<String>,
        edit_sequence: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            list_id: list_id.into(),
            edit_sequence: edit_sequence.into(),
            name: name.into(),
            is_active: true,
            std_due_days: None,
            std_discount_days: None,
            discount_pct: None,
        }
    }

    pub fn with_discount_days(mut self, days: i32) -> Self {
        self.std_discount_days = Some(days);
        self
    }

    fn to_ret(&self) -> StandardTermsRet {
        StandardTermsRet {
            list_id: Some(Scalar::text(&self.list_id)),
            edit_sequence: Some(Scalar::text(&self.edit_sequence)),
            name: Some(Scalar::text(&self.name)),
            is_active: Some(Scalar::Bool(self.is_active)),
            std_due_days: self.std_due_days.map(Scalar::from),
            std_discount_days: self.std_discount_days.map(Scalar::from),
            discount_pct: self.discount_pct.map(Scalar::Float),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CompanySnapshot {
    #[serde(default)]
    terms: Vec<StoredTerm>,
}

/// Engine entry points, as recorded in the call log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineCall {
    OpenConnection,
    BeginSession,
    DoRequests,
    EndSession,
    CloseConnection,
}

#[derive(Default)]
struct CompanyData {
    terms: Vec<StoredTerm>,
    next_sequence: u32,
    calls: Vec<EngineCall>,
    failures: HashMap<EngineCall, EngineError>,
    scripted: VecDeque<Option<ResponseSet>>,
    open_connections: usize,
}

#[derive(Clone, Default)]
pub struct MemoryCompany {
    data: Arc<Mutex<CompanyData>>,
}

impl MemoryCompany {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_terms(terms: Vec<StoredTerm>) -> Self {
        let company = Self::new();
        company.lock().terms = terms;
        company
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        let snapshot: CompanySnapshot = serde_json::from_str(&content)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            terms = snapshot.terms.len(),
            "Loaded company snapshot"
        );
        Ok(Self::with_terms(snapshot.terms))
    }

    pub fn save_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let snapshot = CompanySnapshot {
            terms: self.terms(),
        };
        std::fs::write(path, serde_json::to_string_pretty(&snapshot)?)?;
        Ok(())
    }

    pub fn engine(&self) -> MemoryEngine {
        MemoryEngine {
            company: self.clone(),
            connected: false,
            session_active: false,
        }
    }

    /// Provider for [`crate::TermsReader`]: one new engine per query.
    pub fn provider(&self) -> impl Fn() -> EngineResult<MemoryEngine> + Clone {
        let company = self.clone();
        move || Ok(company.engine())
    }

    /// Makes every later `call` fail with `error` until cleared.
    pub fn fail_on(&self, call: EngineCall, error: EngineError) {
        self.lock().failures.insert(call, error);
    }

    pub fn clear_failures(&self) {
        self.lock().failures.clear();
    }

    /// Queues a canned answer for the next `do_requests`, bypassing request processing.
    pub fn script_response(&self, responses: Option<ResponseSet>) {
        self.lock().scripted.push_back(responses);
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.lock().calls.clone()
    }

    pub fn terms(&self) -> Vec<StoredTerm> {
        self.lock().terms.clone()
    }

    pub fn is_connected(&self) -> bool {
        self.lock().open_connections > 0
    }

    fn lock(&self) -> MutexGuard<'_, CompanyData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct MemoryEngine {
    company: MemoryCompany,
    connected: bool,
    session_active: bool,
}

impl MemoryEngine {
    fn enter(&self, call: EngineCall) -> EngineResult<MutexGuard<'_, CompanyData>> {
        let mut data = self.company.lock();
        data.calls.push(call);
        if let Some(error) = data.failures.get(&call).cloned() {
            return Err(error);
        }
        Ok(data)
    }
}

impl AccountingEngine for MemoryEngine {
    fn open_connection(&mut self, _app_id: &str, app_name: &str) -> EngineResult<()> {
        let mut data = self.enter(EngineCall::OpenConnection)?;
        if self.connected {
            return Err(EngineError::new(ALREADY_CONNECTED, "A connection is already open"));
        }
        data.open_connections += 1;
        drop(data);

        tracing::debug!(%app_name, "Memory engine connection opened");
        self.connected = true;
        Ok(())
    }

    fn close_connection(&mut self) -> EngineResult<()> {
        let mut data = self.enter(EngineCall::CloseConnection)?;
        if !self.connected {
            return Err(EngineError::new(NOT_CONNECTED, "No connection is open"));
        }
        data.open_connections = data.open_connections.saturating_sub(1);
        drop(data);

        self.connected = false;
        self.session_active = false;
        Ok(())
    }

    fn begin_session(&mut self, _company_file: &str, _open_mode: OpenMode) -> EngineResult<()> {
        let guard = self.enter(EngineCall::BeginSession)?;
        if !self.connected {
            return Err(EngineError::new(
                NOT_CONNECTED,
                "BeginSession called without an open connection",
            ));
        }
        if self.session_active {
            return Err(EngineError::new(SESSION_ALREADY_ACTIVE, "A session is already active"));
        }
        drop(guard);

        self.session_active = true;
        Ok(())
    }

    fn end_session(&mut self) -> EngineResult<()> {
        let guard = self.enter(EngineCall::EndSession)?;
        if !self.session_active {
            return Err(EngineError::new(NO_ACTIVE_SESSION, "No session is active"));
        }
        drop(guard);

        self.session_active = false;
        Ok(())
    }

    fn do_requests(&mut self, requests: &RequestSet) -> EngineResult<Option<ResponseSet>> {
        let mut data = self.enter(EngineCall::DoRequests)?;
        if !self.session_active {
            return Err(EngineError::new(
                NO_ACTIVE_SESSION,
                "DoRequests called without an active session",
            ));
        }

        if let Some(scripted) = data.scripted.pop_front() {
            return Ok(scripted);
        }

        let mut responses = Vec::with_capacity(requests.len());
        for request in requests.requests() {
            let response = data.process(request);
            let failed = response.status_severity == StatusSeverity::Error;
            responses.push(response);
            if failed && requests.on_error() == OnError::Stop {
                tracing::debug!(request = request.name(), "Stopping request set after error");
                break;
            }
        }

        Ok(Some(ResponseSet::new(responses)))
    }
}

impl CompanyData {
    fn process(&mut self, request: &Request) -> Response {
        match request {
            Request::StandardTermsQuery => self.query_terms(),
            Request::StandardTermsAdd(term) => self.add_term(term),
            Request::ListDel {
                list_del_type,
                list_id,
            } => self.delete_term(*list_del_type, list_id),
        }
    }

    fn query_terms(&self) -> Response {
        if self.terms.is_empty() {
            return Response::status(
                STATUS_NO_MATCH,
                StatusSeverity::Info,
                "A query request did not find a matching object",
                Some(ResponseType::StandardTermsQueryRs),
            );
        }

        Response::ok(
            ResponseType::StandardTermsQueryRs,
            ResponseDetail::StandardTermsRetList(
                self.terms.iter().map(StoredTerm::to_ret).collect(),
            ),
        )
    }

    fn add_term(&mut self, term: &NewStandardTerm) -> Response {
        if term.name.trim().is_empty() {
            return Response::status(
                STATUS_INVALID_FIELD,
                StatusSeverity::Error,
                "There is an invalid reference to an empty name",
                Some(ResponseType::StandardTermsAddRs),
            );
        }

        if self
            .terms
            .iter()
            .any(|existing| existing.name.eq_ignore_ascii_case(&term.name))
        {
            return Response::status(
                STATUS_NAME_IN_USE,
                StatusSeverity::Error,
                format!("The name \"{}\" of the list element is already in use.", term.name),
                Some(ResponseType::StandardTermsAddRs),
            );
        }

        let stamp = Utc::now().timestamp();
        let list_id = self.next_list_id(stamp);
        let stored = StoredTerm {
            list_id,
            edit_sequence: stamp.to_string(),
            name: term.name.clone(),
            is_active: term.is_active,
            std_due_days: Some(term.std_due_days),
            std_discount_days: Some(term.std_discount_days),
            discount_pct: Some(term.discount_pct),
        };
        let ret = stored.to_ret();
        self.terms.push(stored);

        Response::ok(
            ResponseType::StandardTermsAddRs,
            ResponseDetail::StandardTermsRet(ret),
        )
    }

    fn delete_term(&mut self, list_del_type: ListDelType, list_id: &str) -> Response {
        let position = match list_del_type {
            ListDelType::StandardTerms => {
                self.terms.iter().position(|term| term.list_id == list_id)
            }
            ListDelType::DateDrivenTerms => None,
        };

        let Some(position) = position else {
            return Response::status(
                STATUS_OBJECT_NOT_FOUND,
                StatusSeverity::Error,
                format!("Object \"{}\" specified in the request cannot be found.", list_id),
                Some(ResponseType::ListDelRs),
            );
        };

        let removed = self.terms.remove(position);
        Response::ok(
            ResponseType::ListDelRs,
            ResponseDetail::ListDelRet(ListDelRet {
                list_del_type,
                list_id: removed.list_id,
                time_deleted: Some(Utc::now().to_rfc3339()),
                full_name: Some(removed.name),
            }),
        )
    }

    fn next_list_id(&mut self, stamp: i64) -> String {
        if self.next_sequence < FIRST_LIST_SEQUENCE {
            self.next_sequence = FIRST_LIST_SEQUENCE;
        }
        loop {
            let candidate = format!("{:X}-{}", self.next_sequence, stamp);
            self.next_sequence = self.next_sequence.wrapping_add(1);
            if !self.terms.iter().any(|term| term.list_id == candidate) {
                return candidate;
            }
        }
    }
}
