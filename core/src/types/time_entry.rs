use serde::{Deserialize, Serialize};

use crate::codec::{rfc3339, Timestamp};

/// A tracked time entry. A running entry has a negative `duration` and no
/// `stop`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billable: Option<bool>,
    #[serde(default, with = "rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub start: Option<Timestamp>,
    #[serde(default, with = "rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub stop: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_ids: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duronly: Option<bool>,
    #[serde(default, with = "rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub at: Option<Timestamp>,
    #[serde(default, with = "rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub server_deleted_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateTimeEntryRequestBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_with: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duronly: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
    #[serde(default, with = "rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub start: Option<Timestamp>,
    #[serde(default, with = "rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub stop: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_ids: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateTimeEntryRequestBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
    #[serde(default, with = "rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub start: Option<Timestamp>,
    #[serde(default, with = "rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub stop: Option<Timestamp>,
    /// `"add"` or `"delete"`, applied to `tags`/`tag_ids`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_ids: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<i64>,
}

/// Filters for `GET /api/v9/me/time_entries`. Dates are `YYYY-MM-DD` or
/// RFC 3339; `since` is a UNIX timestamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListTimeEntriesQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode_body, encode_body};
    use crate::endpoint::encode_query;

    #[test]
    fn running_entry_decodes_without_stop() {
        let entry: TimeEntry = decode_body(
            br#"{"id":1,"workspace_id":2,"start":"2021-01-02T03:04:05+00:00","stop":null,"duration":-1609556645,"tags":null}"#,
        )
        .unwrap()
        .unwrap();
        assert_eq!(entry.id, Some(1));
        assert!(entry.stop.is_none());
        assert!(entry.tags.is_none());
        assert_eq!(entry.start.unwrap().offset().local_minus_utc(), 0);
    }

    #[test]
    fn create_body_keeps_zero_values() {
        let body = CreateTimeEntryRequestBody {
            billable: Some(false),
            duration: Some(0),
            description: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(
            encode_body(&body).unwrap(),
            r#"{"billable":false,"description":"","duration":0}"#
        );
    }

    #[test]
    fn list_query_orders_keys() {
        let query = ListTimeEntriesQuery {
            start_date: Some("2021-01-01".to_string()),
            end_date: Some("2021-02-01".to_string()),
            ..Default::default()
        };
        assert_eq!(
            encode_query(&query).unwrap(),
            "end_date=2021-02-01&start_date=2021-01-01"
        );
    }
}
