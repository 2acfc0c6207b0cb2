use crate::core::session::SessionGateway;
use crate::domain::model::NewStandardTerm;
use crate::domain::ports::AccountingEngine;
use crate::domain::request::ListDelType;
use crate::domain::response::{Response, ResponseDetail, ResponseSet, Scalar};
use crate::utils::error::{Result, TermsError};

/// Adds a standard term and returns the ListID the engine assigned to it.
pub fn insert_standard_term<E: AccountingEngine>(
    gateway: &mut SessionGateway<E>,
    term: &NewStandardTerm,
) -> Result<String> {
    let mut requests = gateway.create_request();
    requests.append_standard_terms_add(term.clone());

    let responses = gateway.send(&requests)?;
    let response = first_response(responses.as_ref(), "StandardTermsAddRq")?;

    if response.status_code != 0 {
        return Err(TermsError::RequestFailed {
            status_code: response.status_code,
            message: response.status_message.clone().unwrap_or_default(),
        });
    }

    let list_id = match &response.detail {
        Some(ResponseDetail::StandardTermsRet(ret)) => ret
            .list_id
            .as_ref()
            .and_then(Scalar::as_str)
            .map(str::to_string),
        _ => None,
    }
    .ok_or_else(|| TermsError::MissingResponse {
        message: "No StandardTermsRet with a ListID after StandardTermsAddRq".to_string(),
    })?;

    tracing::info!(%list_id, name = %term.name, "Inserted standard term");
    Ok(list_id)
}

/// Deletes a standard term by ListID. Returns whether the engine confirmed it.
pub fn delete_standard_term<E: AccountingEngine>(
    gateway: &mut SessionGateway<E>,
    list_id: &str,
) -> Result<bool> {
    let mut requests = gateway.create_request();
    requests.append_list_del(ListDelType::StandardTerms, list_id);

    let responses = gateway.send(&requests)?;
    let Ok(response) = first_response(responses.as_ref(), "ListDelRq") else {
        return Ok(false);
    };

    if response.status_code >= 0 && response.detail.is_some() {
        tracing::info!(%list_id, "Deleted standard term");
        Ok(true)
    } else {
        tracing::warn!(
            %list_id,
            message = response.status_message.as_deref().unwrap_or(""),
            "Error deleting standard term"
        );
        Ok(false)
    }
}

fn first_response<'a>(responses: Option<&'a ResponseSet>, request: &str) -> Result<&'a Response> {
    responses
        .and_then(|set| set.response_list.as_ref())
        .and_then(|list| list.first())
        .ok_or_else(|| TermsError::MissingResponse {
            message: format!("No response from {}", request),
        })
}
