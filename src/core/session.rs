use crate::config::{
    GatewayConfig, REQUEST_COUNTRY, REQUEST_MAJOR_VERSION, REQUEST_MINOR_VERSION,
};
use crate::domain::ports::AccountingEngine;
use crate::domain::request::{OnError, RequestSet};
use crate::domain::response::ResponseSet;
use crate::utils::error::{Result, TermsError};
use std::fmt;

/// Where a session currently stands. Teardown is derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Closed,
    ConnectionOpen,
    SessionActive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStage {
    CreateEngine,
    OpenConnection,
    BeginSession,
    EndSession,
    CloseConnection,
}

impl fmt::Display for SessionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionStage::CreateEngine => "create engine",
            SessionStage::OpenConnection => "open connection",
            SessionStage::BeginSession => "begin session",
            SessionStage::EndSession => "end session",
            SessionStage::CloseConnection => "close connection",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeardownStep {
    EndSession,
    CloseConnection,
}

impl TeardownStep {
    pub fn stage(self) -> SessionStage {
        match self {
            TeardownStep::EndSession => SessionStage::EndSession,
            TeardownStep::CloseConnection => SessionStage::CloseConnection,
        }
    }
}

impl SessionState {
    /// Release calls needed to get back to `Closed`, in order.
    pub fn teardown_steps(self) -> &'static [TeardownStep] {
        match self {
            SessionState::Closed => &[],
            SessionState::ConnectionOpen => &[TeardownStep::CloseConnection],
            SessionState::SessionActive => {
                &[TeardownStep::EndSession, TeardownStep::CloseConnection]
            }
        }
    }
}

/// An open connection plus session on an accounting engine.
///
/// Dropping the gateway releases whatever was opened; [`SessionGateway::close`]
/// does the same but reports the first release failure.
pub struct SessionGateway<E: AccountingEngine> {
    engine: E,
    config: GatewayConfig,
    state: SessionState,
}

impl<E: AccountingEngine> SessionGateway<E> {
    pub fn open(engine: E, config: &GatewayConfig) -> Result<Self> {
        let mut gateway = Self {
            engine,
            config: config.clone(),
            state: SessionState::Closed,
        };

        tracing::debug!(app_name = %config.app_name, "Opening connection");
        gateway
            .engine
            .open_connection(&config.app_id, &config.app_name)
            .map_err(|source| TermsError::Connection {
                stage: SessionStage::OpenConnection,
                source,
            })?;
        gateway.state = SessionState::ConnectionOpen;

        tracing::debug!(
            company_file = %config.company_file,
            open_mode = ?config.open_mode,
            "Beginning session"
        );
        // On failure the gateway is dropped here, which closes the connection.
        gateway
            .engine
            .begin_session(&config.company_file, config.open_mode)
            .map_err(|source| TermsError::Connection {
                stage: SessionStage::BeginSession,
                source,
            })?;
        gateway.state = SessionState::SessionActive;

        Ok(gateway)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Empty US 16.0 request set that keeps processing after a failed request.
    pub fn create_request(&mut self) -> RequestSet {
        let mut requests = self.engine.create_request_set(
            REQUEST_COUNTRY,
            REQUEST_MAJOR_VERSION,
            REQUEST_MINOR_VERSION,
        );
        requests.set_on_error(OnError::Continue);
        requests
    }

    pub fn send(&mut self, requests: &RequestSet) -> Result<Option<ResponseSet>> {
        tracing::debug!(requests = requests.len(), "Sending request set");
        self.engine
            .do_requests(requests)
            .map_err(TermsError::Transport)
    }

    pub fn close(mut self) -> Result<()> {
        match self.release() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn release(&mut self) -> Option<TermsError> {
        let mut first_failure = None;

        for step in self.state.teardown_steps() {
            let outcome = match step {
                TeardownStep::EndSession => self.engine.end_session(),
                TeardownStep::CloseConnection => self.engine.close_connection(),
            };

            match outcome {
                Ok(()) => tracing::debug!(stage = %step.stage(), "Released"),
                Err(source) => {
                    tracing::warn!(stage = %step.stage(), error = %source, "Release step failed");
                    first_failure.get_or_insert(TermsError::Teardown {
                        stage: step.stage(),
                        source,
                    });
                }
            }
        }

        self.state = SessionState::Closed;
        first_failure
    }
}

impl<E: AccountingEngine> Drop for SessionGateway<E> {
    fn drop(&mut self) {
        if self.state != SessionState::Closed {
            let _ = self.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::request::OpenMode;
    use crate::utils::error::{EngineError, EngineResult};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct MockEngine {
        calls: Rc<RefCell<Vec<&'static str>>>,
        fail_open: bool,
        fail_begin: bool,
        fail_end: bool,
        fail_send: bool,
    }

    impl MockEngine {
        fn record(&self, call: &'static str, fail: bool) -> EngineResult<()> {
            self.calls.borrow_mut().push(call);
            if fail {
                Err(EngineError::new(0x8004_0400, format!("{} failed", call)))
            } else {
                Ok(())
            }
        }
    }

    impl AccountingEngine for MockEngine {
        fn open_connection(&mut self, _app_id: &str, _app_name: &str) -> EngineResult<()> {
            self.record("open", self.fail_open)
        }

        fn close_connection(&mut self) -> EngineResult<()> {
            self.record("close", false)
        }

        fn begin_session(&mut self, _company_file: &str, _open_mode: OpenMode) -> EngineResult<()> {
            self.record("begin", self.fail_begin)
        }

        fn end_session(&mut self) -> EngineResult<()> {
            self.record("end", self.fail_end)
        }

        fn do_requests(&mut self, _requests: &RequestSet) -> EngineResult<Option<ResponseSet>> {
            self.record("send", self.fail_send)?;
            Ok(Some(ResponseSet::new(vec![])))
        }
    }

    fn engine() -> (MockEngine, Rc<RefCell<Vec<&'static str>>>) {
        let engine = MockEngine::default();
        let calls = engine.calls.clone();
        (engine, calls)
    }

    #[test]
    fn test_teardown_steps_follow_state() {
        assert!(SessionState::Closed.teardown_steps().is_empty());
        assert_eq!(
            SessionState::ConnectionOpen.teardown_steps(),
            &[TeardownStep::CloseConnection]
        );
        assert_eq!(
            SessionState::SessionActive.teardown_steps(),
            &[TeardownStep::EndSession, TeardownStep::CloseConnection]
        );
    }

    #[test]
    fn test_open_send_close_sequence() {
        let (engine, calls) = engine();
        let mut gateway = SessionGateway::open(engine, &GatewayConfig::default()).unwrap();
        assert_eq!(gateway.state(), SessionState::SessionActive);

        let requests = gateway.create_request();
        gateway.send(&requests).unwrap();
        gateway.close().unwrap();

        assert_eq!(*calls.borrow(), vec!["open", "begin", "send", "end", "close"]);
    }

    #[test]
    fn test_open_connection_failure_releases_nothing() {
        let (mut engine, calls) = engine();
        engine.fail_open = true;

        let err = SessionGateway::open(engine, &GatewayConfig::default())
            .err()
            .unwrap();

        assert!(matches!(
            err,
            TermsError::Connection {
                stage: SessionStage::OpenConnection,
                ..
            }
        ));
        assert_eq!(*calls.borrow(), vec!["open"]);
    }

    #[test]
    fn test_begin_session_failure_closes_connection_only() {
        let (mut engine, calls) = engine();
        engine.fail_begin = true;

        let err = SessionGateway::open(engine, &GatewayConfig::default())
            .err()
            .unwrap();

        assert!(matches!(
            err,
            TermsError::Connection {
                stage: SessionStage::BeginSession,
                ..
            }
        ));
        assert_eq!(*calls.borrow(), vec!["open", "begin", "close"]);
    }

    #[test]
    fn test_end_session_failure_still_closes_connection() {
        let (mut engine, calls) = engine();
        engine.fail_end = true;

        let gateway = SessionGateway::open(engine, &GatewayConfig::default()).unwrap();
        let err = gateway.close().unwrap_err();

        assert!(matches!(
            err,
            TermsError::Teardown {
                stage: SessionStage::EndSession,
                ..
            }
        ));
        assert_eq!(*calls.borrow(), vec!["open", "begin", "end", "close"]);
    }

    #[test]
    fn test_send_failure_propagates_and_drop_releases() {
        let (mut engine, calls) = engine();
        engine.fail_send = true;

        {
            let mut gateway = SessionGateway::open(engine, &GatewayConfig::default()).unwrap();
            let requests = gateway.create_request();
            let err = gateway.send(&requests).unwrap_err();
            assert!(matches!(err, TermsError::Transport(_)));
        }

        assert_eq!(*calls.borrow(), vec!["open", "begin", "send", "end", "close"]);
    }

    #[test]
    fn test_create_request_is_fixed_us_16_continue() {
        let (engine, _calls) = engine();
        let config = GatewayConfig {
            company_file: "sample.qbw".to_string(),
            open_mode: OpenMode::SingleUser,
            ..GatewayConfig::default()
        };

        let mut gateway = SessionGateway::open(engine, &config).unwrap();
        let requests = gateway.create_request();

        assert_eq!(requests.country(), "US");
        assert_eq!(requests.version(), (16, 0));
        assert_eq!(requests.on_error(), OnError::Continue);
        assert!(requests.is_empty());
    }

    #[test]
    fn test_engine_default_stop_mode_is_overridden() {
        struct StopByDefault(MockEngine);

        impl AccountingEngine for StopByDefault {
            fn open_connection(&mut self, app_id: &str, app_name: &str) -> EngineResult<()> {
                self.0.open_connection(app_id, app_name)
            }

            fn close_connection(&mut self) -> EngineResult<()> {
                self.0.close_connection()
            }

            fn begin_session(&mut self, file: &str, open_mode: OpenMode) -> EngineResult<()> {
                self.0.begin_session(file, open_mode)
            }

            fn end_session(&mut self) -> EngineResult<()> {
                self.0.end_session()
            }

            fn create_request_set(&mut self, c: &str, major: u16, minor: u16) -> RequestSet {
                let mut requests = RequestSet::new(c, major, minor);
                requests.set_on_error(OnError::Stop);
                requests
            }

            fn do_requests(&mut self, set: &RequestSet) -> EngineResult<Option<ResponseSet>> {
                self.0.do_requests(set)
            }
        }

        let (engine, _calls) = engine();
        let mut gateway =
            SessionGateway::open(StopByDefault(engine), &GatewayConfig::default()).unwrap();

        assert_eq!(gateway.create_request().on_error(), OnError::Continue);
    }
}
