//! URL composition and typed query encoding.
//!
//! Rules:
//! 1) exactly one `/` separates the base path from the path fragment
//! 2) only fields present after serialization become query pairs, so unset
//!    `Option`s (skipped or `null`) never appear
//! 3) pairs are sorted by key and form-urlencoded
//! 4) an absent or empty query leaves the URL without `?`

use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::error::{Error, Result};

/// Join `fragment` onto the path of `base`.
pub fn join_path(base: &Url, fragment: &str) -> Url {
    let mut url = base.clone();
    let base_path = base.path().trim_end_matches('/');
    let fragment = fragment.trim_start_matches('/');
    url.set_path(&format!("{base_path}/{fragment}"));
    url.set_query(None);
    url.set_fragment(None);
    url
}

/// Encode a query struct as `k=v&k=v` with keys in lexicographic order.
pub fn encode_query<Q>(query: &Q) -> Result<String>
where
    Q: Serialize + ?Sized,
{
    let fields = match serde_json::to_value(query).map_err(|e| Error::BadQuery(e.to_string()))? {
        Value::Null => return Ok(String::new()),
        Value::Object(fields) => fields,
        other => {
            return Err(Error::BadQuery(format!(
                "query must serialize to an object, got {}",
                value_kind(&other)
            )))
        }
    };

    let mut pairs = Vec::with_capacity(fields.len());
    for (key, value) in fields {
        let rendered = match value {
            Value::Null => continue,
            Value::Bool(flag) => flag.to_string(),
            Value::Number(number) => number.to_string(),
            Value::String(text) => text,
            other => {
                return Err(Error::BadQuery(format!(
                    "query field {key:?} is {}, expected a scalar",
                    value_kind(&other)
                )))
            }
        };
        pairs.push((key, rendered));
    }
    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in &pairs {
        serializer.append_pair(key, value);
    }
    Ok(serializer.finish())
}

/// Percent-encode `segment` so it stays one path segment. Spaces become
/// `%20` since a `+` in a path is a literal plus.
pub fn encode_path_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Absolute URL for `fragment` under `base`, with `query` appended.
pub fn compose_url<Q>(base: &Url, fragment: &str, query: Option<&Q>) -> Result<Url>
where
    Q: Serialize + ?Sized,
{
    let mut url = join_path(base, fragment);
    if let Some(query) = query {
        let encoded = encode_query(query)?;
        if !encoded.is_empty() {
            url.set_query(Some(&encoded));
        }
    }
    Ok(url)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize, Default)]
    struct UsersQuery {
        #[serde(skip_serializing_if = "Option::is_none")]
        page: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        filter: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        only_admins: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        per_page: Option<i64>,
    }

    #[derive(Serialize)]
    struct NullableQuery {
        active: Option<bool>,
        name: Option<String>,
    }

    #[derive(Serialize)]
    struct NestedQuery {
        ids: Vec<i64>,
    }

    fn base(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    #[test]
    fn join_path_uses_exactly_one_separator() {
        let expected = "https://api.track.toggl.com/api/v9/me";
        for b in ["https://api.track.toggl.com", "https://api.track.toggl.com/"] {
            for fragment in ["api/v9/me", "/api/v9/me"] {
                assert_eq!(join_path(&base(b), fragment).as_str(), expected, "{b} + {fragment}");
            }
        }
    }

    #[test]
    fn join_path_keeps_base_prefix() {
        for b in ["http://localhost:3000/proxy", "http://localhost:3000/proxy/"] {
            assert_eq!(
                join_path(&base(b), "/api/v9/me").as_str(),
                "http://localhost:3000/proxy/api/v9/me"
            );
        }
    }

    #[test]
    fn partial_query_is_sorted_and_skips_unset() {
        let query = UsersQuery {
            page: Some(2),
            filter: Some("toggl".to_string()),
            only_admins: Some("true".to_string()),
            per_page: None,
        };
        assert_eq!(encode_query(&query).unwrap(), "filter=toggl&only_admins=true&page=2");
    }

    #[test]
    fn encoding_is_deterministic() {
        let query = UsersQuery {
            page: Some(1),
            filter: Some("a b&c".to_string()),
            ..Default::default()
        };
        let first = encode_query(&query).unwrap();
        assert_eq!(first, encode_query(&query).unwrap());
        assert_eq!(first, "filter=a+b%26c&page=1");
    }

    #[test]
    fn empty_and_absent_queries_add_no_question_mark() {
        let b = base("https://api.track.toggl.com/");
        let empty = compose_url(&b, "api/v9/me", Some(&UsersQuery::default())).unwrap();
        assert_eq!(empty.as_str(), "https://api.track.toggl.com/api/v9/me");
        let absent = compose_url::<UsersQuery>(&b, "api/v9/me", None).unwrap();
        assert_eq!(absent.as_str(), "https://api.track.toggl.com/api/v9/me");
        assert_eq!(encode_query(&Option::<UsersQuery>::None).unwrap(), "");
    }

    #[test]
    fn null_fields_are_treated_as_unset() {
        let query = NullableQuery {
            active: Some(false),
            name: None,
        };
        assert_eq!(encode_query(&query).unwrap(), "active=false");
    }

    #[test]
    fn nested_values_are_bad_query() {
        let err = encode_query(&NestedQuery { ids: vec![1, 2] }).unwrap_err();
        assert!(matches!(err, Error::BadQuery(_)));
        assert!(matches!(encode_query(&42).unwrap_err(), Error::BadQuery(_)));
    }

    #[test]
    fn path_segments_escape_space_and_slash() {
        assert_eq!(encode_path_segment("a b+c/d"), "a%20b%2Bc%2Fd");
        assert_eq!(encode_path_segment("abc-123_x.y"), "abc-123_x.y");
        let url = join_path(&base("https://x.test/"), &format!("v/{}", encode_path_segment("a b")));
        assert_eq!(url.path(), "/v/a%20b");
    }

    #[test]
    fn compose_url_appends_query() {
        let url = compose_url(
            &base("https://api.track.toggl.com/"),
            "/api/v9/organizations/1/users",
            Some(&UsersQuery {
                per_page: Some(50),
                ..Default::default()
            }),
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.track.toggl.com/api/v9/organizations/1/users?per_page=50"
        );
    }
}
