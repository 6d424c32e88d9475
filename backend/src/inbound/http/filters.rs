//! Parsing for list-endpoint query parameters.

use serde_json::json;
use uuid::Uuid;

use crate::domain::Error;

/// Parse a comma-separated id list such as `tags=a,b,c`.
pub(crate) fn parse_id_list(raw: &str, field: &'static str) -> Result<Vec<Uuid>, Error> {
    raw.split(',')
        .map(str::trim)
        .enumerate()
        .map(|(index, value)| {
            Uuid::parse_str(value).map_err(|_| {
                Error::invalid_request(format!("{field} must be a comma-separated list of ids"))
                    .with_details(json!({
                        "field": field,
                        "index": index,
                        "value": value,
                    }))
            })
        })
        .collect()
}

/// Parse the `assigned_only` flag; only `0` and `1` are accepted.
pub(crate) fn parse_assigned_only(raw: Option<&str>) -> Result<bool, Error> {
    match raw {
        None | Some("0") => Ok(false),
        Some("1") => Ok(true),
        Some(other) => Err(
            Error::invalid_request("assigned_only must be 0 or 1").with_details(json!({
                "field": "assigned_only",
                "value": other,
            })),
        ),
    }
}
