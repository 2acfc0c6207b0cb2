use crate::domain::model::PaymentTerm;
use crate::domain::response::{ResponseDetail, ResponseSet, ResponseType, Scalar, StandardTermsRet};

/// Maps every usable StandardTermsQuery response in `responses` to term records.
///
/// Responses that failed, carry no detail, or are tagged with another type
/// are skipped, as are entries missing ListID, EditSequence or Name. The
/// walk never fails.
pub fn walk_standard_terms_query(responses: Option<&ResponseSet>) -> Vec<PaymentTerm> {
    let mut terms = Vec::new();

    let Some(response_list) = responses.and_then(|set| set.response_list.as_ref()) else {
        tracing::debug!("No response list returned");
        return terms;
    };

    for (index, response) in response_list.iter().enumerate() {
        if response.status_code < 0 {
            tracing::warn!(
                index,
                status_code = response.status_code,
                message = response.status_message.as_deref().unwrap_or(""),
                "Skipping failed response"
            );
            continue;
        }
        if response.status_code > 0 {
            tracing::debug!(
                index,
                status_code = response.status_code,
                message = response.status_message.as_deref().unwrap_or(""),
                "Response returned with warning"
            );
        }

        let Some(detail) = response.detail.as_ref() else {
            continue;
        };

        if response.response_type != Some(ResponseType::StandardTermsQueryRs) {
            tracing::warn!(
                index,
                response_type = ?response.response_type,
                "Skipping response of unexpected type"
            );
            continue;
        }

        match detail {
            ResponseDetail::StandardTermsRetList(entries) => {
                terms.extend(walk_standard_terms_ret(entries));
            }
            other => {
                tracing::warn!(
                    index,
                    detail = other.kind(),
                    "Detail does not match StandardTermsQueryRs tag"
                );
            }
        }
    }

    terms
}

pub fn walk_standard_terms_ret(entries: &[StandardTermsRet]) -> Vec<PaymentTerm> {
    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| map_standard_term(index, entry))
        .collect()
}

fn map_standard_term(index: usize, entry: &StandardTermsRet) -> Option<PaymentTerm> {
    let external_id = required_text(index, "ListID", entry.list_id.as_ref())?;
    let revision_token = required_text(index, "EditSequence", entry.edit_sequence.as_ref())?;
    let name = required_text(index, "Name", entry.name.as_ref())?;

    let discount_days = match &entry.std_discount_days {
        None => 0,
        Some(value) => value.as_i32().unwrap_or_else(|| {
            tracing::warn!(index, value = ?value, "Unreadable StdDiscountDays, using 0");
            0
        }),
    };

    tracing::debug!(%name, %external_id, %revision_token, discount_days, "Mapped standard term");
    Some(PaymentTerm::new(external_id, revision_token, name, discount_days))
}

fn required_text(index: usize, field: &'static str, value: Option<&Scalar>) -> Option<String> {
    match value.and_then(Scalar::as_str) {
        Some(text) => Some(text.to_string()),
        None => {
            tracing::warn!(index, field, "Skipping term entry without required field");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::request::ListDelType;
    use crate::domain::response::{ListDelRet, Response, StatusSeverity};

    fn terms_response(entries: Vec<StandardTermsRet>) -> Response {
        Response::ok(
            ResponseType::StandardTermsQueryRs,
            ResponseDetail::StandardTermsRetList(entries),
        )
    }

    #[test]
    fn test_absent_response_set_or_list() {
        assert!(walk_standard_terms_query(None).is_empty());
        assert!(walk_standard_terms_query(Some(&ResponseSet::without_list())).is_empty());
        assert!(walk_standard_terms_query(Some(&ResponseSet::new(vec![]))).is_empty());
    }

    #[test]
    fn test_maps_fields_in_order() {
        let set = ResponseSet::new(vec![terms_response(vec![
            StandardTermsRet::new("80000001-1234567890", "1", "Net 30").with_discount_days(10),
            StandardTermsRet::new("80000002-1234567890", "7", "Net 15").with_discount_days(5),
            StandardTermsRet::new("80000003-1234567890", "2", "Due on receipt"),
        ])]);

        let terms = walk_standard_terms_query(Some(&set));

        assert_eq!(
            terms,
            vec![
                PaymentTerm::new("80000001-1234567890", "1", "Net 30", 10),
                PaymentTerm::new("80000002-1234567890", "7", "Net 15", 5),
                PaymentTerm::new("80000003-1234567890", "2", "Due on receipt", 0),
            ]
        );
    }

    #[test]
    fn test_negative_status_contributes_nothing() {
        let failed = Response::status(
            -1,
            StatusSeverity::Error,
            "request failed",
            Some(ResponseType::StandardTermsQueryRs),
        )
        .with_detail(ResponseDetail::StandardTermsRetList(vec![
            StandardTermsRet::new("80000009-1", "1", "Should not appear"),
        ]));
        let set = ResponseSet::new(vec![failed]);

        assert!(walk_standard_terms_query(Some(&set)).is_empty());
    }

    #[test]
    fn test_warning_status_is_still_usable() {
        let mut response = terms_response(vec![StandardTermsRet::new("80000001-1", "1", "Net 10")]);
        response.status_code = 530;
        response.status_severity = StatusSeverity::Warn;

        let terms = walk_standard_terms_query(Some(&ResponseSet::new(vec![response])));
        assert_eq!(terms.len(), 1);
    }

    #[test]
    fn test_wrong_type_tag_contributes_nothing() {
        let mut response = terms_response(vec![StandardTermsRet::new("80000001-1", "1", "Net 10")]);
        response.response_type = Some(ResponseType::StandardTermsAddRs);

        let mut untagged = terms_response(vec![StandardTermsRet::new("80000002-1", "1", "Net 20")]);
        untagged.response_type = None;

        let set = ResponseSet::new(vec![response, untagged]);
        assert!(walk_standard_terms_query(Some(&set)).is_empty());
    }

    #[test]
    fn test_detail_not_matching_tag_is_skipped() {
        let response = Response::ok(
            ResponseType::StandardTermsQueryRs,
            ResponseDetail::ListDelRet(ListDelRet {
                list_del_type: ListDelType::StandardTerms,
                list_id: "80000001-1".to_string(),
                time_deleted: None,
                full_name: None,
            }),
        );

        assert!(walk_standard_terms_query(Some(&ResponseSet::new(vec![response]))).is_empty());
    }

    #[test]
    fn test_missing_detail_is_skipped() {
        let empty_query = Response::status(
            1,
            StatusSeverity::Info,
            "A query request did not find a matching object",
            Some(ResponseType::StandardTermsQueryRs),
        );

        assert!(walk_standard_terms_query(Some(&ResponseSet::new(vec![empty_query]))).is_empty());
    }

    #[test]
    fn test_discount_days_defaults_and_malformed_values() {
        let set = ResponseSet::new(vec![terms_response(vec![
            StandardTermsRet::new("80000001-1", "1", "No discount"),
            StandardTermsRet::new("80000002-1", "1", "Text days").with_discount_days("12"),
            StandardTermsRet::new("80000003-1", "1", "Garbage days").with_discount_days("twelve"),
            StandardTermsRet::new("80000004-1", "1", "Boolean days")
                .with_discount_days(Scalar::Bool(true)),
        ])]);

        let days: Vec<i32> = walk_standard_terms_query(Some(&set))
            .iter()
            .map(PaymentTerm::discount_days)
            .collect();

        assert_eq!(days, vec![0, 12, 0, 0]);
    }

    #[test]
    fn test_entry_missing_required_field_is_skipped() {
        let mut no_name = StandardTermsRet::new("80000002-1", "1", "placeholder");
        no_name.name = None;
        let mut numeric_id = StandardTermsRet::new("ignored", "1", "Numeric id");
        numeric_id.list_id = Some(Scalar::Int(42));

        let set = ResponseSet::new(vec![terms_response(vec![
            StandardTermsRet::new("80000001-1", "1", "Kept"),
            no_name,
            numeric_id,
            StandardTermsRet::new("80000004-1", "1", "Also kept"),
        ])]);

        let names: Vec<String> = walk_standard_terms_query(Some(&set))
            .iter()
            .map(|term| term.name().to_string())
            .collect();

        assert_eq!(names, vec!["Kept", "Also kept"]);
    }

    #[test]
    fn test_multiple_responses_accumulate() {
        let set = ResponseSet::new(vec![
            terms_response(vec![StandardTermsRet::new("80000001-1", "1", "First")]),
            Response::status(-3, StatusSeverity::Error, "boom", None),
            terms_response(vec![
                StandardTermsRet::new("80000002-1", "1", "Second"),
                StandardTermsRet::new("80000003-1", "1", "Third"),
            ]),
        ]);

        let ids: Vec<String> = walk_standard_terms_query(Some(&set))
            .iter()
            .map(|term| term.external_id().to_string())
            .collect();

        assert_eq!(ids, vec!["80000001-1", "80000002-1", "80000003-1"]);
    }
}
