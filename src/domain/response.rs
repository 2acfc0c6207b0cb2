use crate::domain::request::ListDelType;

/// A typed field value as exposed by the engine's response objects.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    pub fn text(value: impl Into<String>) -> Self {
        Scalar::Text(value.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Integer view of the value. Numeric text is parsed; anything that does
    /// not fit an `i32` yields `None`.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Scalar::Int(value) => i32::try_from(*value).ok(),
            Scalar::Float(value) if value.fract() == 0.0 => {
                if *value >= f64::from(i32::MIN) && *value <= f64::from(i32::MAX) {
                    Some(*value as i32)
                } else {
                    None
                }
            }
            Scalar::Text(value) => value.trim().parse().ok(),
            _ => None,
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Int(i64::from(value))
    }
}

/// One StandardTermsRet element. Every field is optional on the wire; the
/// walk decides which ones are required.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StandardTermsRet {
    pub list_id: Option<Scalar>,
    pub edit_sequence: Option<Scalar>,
    pub name: Option<Scalar>,
    pub is_active: Option<Scalar>,
    pub std_due_days: Option<Scalar>,
    pub std_discount_days: Option<Scalar>,
    pub discount_pct: Option<Scalar>,
}

impl StandardTermsRet {
    pub fn new(
        list_id: impl Into<String>,
        edit_sequence: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            list_id: Some(Scalar::Text(list_id.into())),
            edit_sequence: Some(Scalar::Text(edit_sequence.into())),
            name: Some(Scalar::Text(name.into())),
            ..Self::default()
        }
    }

    pub fn with_discount_days(mut self, value: impl Into<Scalar>) -> Self {
        self.std_discount_days = Some(value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListDelRet {
    pub list_del_type: ListDelType,
    pub list_id: String,
    pub time_deleted: Option<String>,
    pub full_name: Option<String>,
}

/// Runtime type tag carried by each response, independent of its detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseType {
    StandardTermsQueryRs,
    StandardTermsAddRs,
    ListDelRs,
}

/// Request-specific payload of a response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseDetail {
    StandardTermsRetList(Vec<StandardTermsRet>),
    StandardTermsRet(StandardTermsRet),
    ListDelRet(ListDelRet),
}

impl ResponseDetail {
    pub fn kind(&self) -> &'static str {
        match self {
            ResponseDetail::StandardTermsRetList(_) => "StandardTermsRetList",
            ResponseDetail::StandardTermsRet(_) => "StandardTermsRet",
            ResponseDetail::ListDelRet(_) => "ListDelRet",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusSeverity {
    #[default]
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// 0 is OK, positive values are warnings, negative values mean the
    /// request failed.
    pub status_code: i32,
    pub status_severity: StatusSeverity,
    pub status_message: Option<String>,
    pub response_type: Option<ResponseType>,
    pub detail: Option<ResponseDetail>,
}

impl Response {
    pub fn ok(response_type: ResponseType, detail: ResponseDetail) -> Self {
        Self {
            status_code: 0,
            status_severity: StatusSeverity::Info,
            status_message: Some("Status OK".to_string()),
            response_type: Some(response_type),
            detail: Some(detail),
        }
    }

    pub fn status(
        status_code: i32,
        status_severity: StatusSeverity,
        message: impl Into<String>,
        response_type: Option<ResponseType>,
    ) -> Self {
        Self {
            status_code,
            status_severity,
            status_message: Some(message.into()),
            response_type,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: ResponseDetail) -> Self {
        self.detail = Some(detail);
        self
    }
}

/// Everything the engine returned for one request set. `response_list` is
/// `None` when the engine produced a set without a list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseSet {
    pub response_list: Option<Vec<Response>>,
}

impl ResponseSet {
    pub fn new(responses: Vec<Response>) -> Self {
        Self {
            response_list: Some(responses),
        }
    }

    pub fn without_list() -> Self {
        Self {
            response_list: None,
        }
    }

    pub fn responses(&self) -> &[Response] {
        self.response_list.as_deref().unwrap_or(&[])
    }
}
