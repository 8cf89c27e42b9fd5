//! Verify the core against JSON test vectors stored in `test-vectors/`.
//!
//! Each exchange vector describes the call, the request that must reach the
//! transport, the scripted response and the expected outcome. Bodies are
//! compared byte for byte; decoded values are compared as parsed JSON.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use toggl_core::codec::{decode_body, encode_body};
use toggl_core::endpoint::encode_query;
use toggl_core::types::legacy;
use toggl_core::types::time_entry::CreateTimeEntryRequestBody;
use toggl_core::types::{
    ListClientsQuery, ListOrganizationUsersQuery, UpdateMeRequestBody, UpdateWorkspaceUserRequestBody,
    Workspace,
};
use toggl_core::{
    with_api_token, with_base_url, with_transport, BoxError, Context, HttpMethod, HttpRequest, HttpResponse,
    Sentinel, Temporary, Timeout, TogglClient, Transport,
};

/// Answers every request with one scripted response and keeps the requests.
#[derive(Debug)]
struct Scripted {
    response: HttpResponse,
    seen: Mutex<Vec<HttpRequest>>,
}

#[async_trait]
impl Transport for Scripted {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, BoxError> {
        self.seen.lock().unwrap().push(request);
        Ok(self.response.clone())
    }
}

fn scripted_client(base_url: &str, credential: &str, response: HttpResponse) -> (TogglClient, Arc<Scripted>) {
    let transport = Arc::new(Scripted {
        response,
        seen: Mutex::new(Vec::new()),
    });
    let client = TogglClient::from_options([
        with_base_url(base_url),
        with_api_token(credential),
        with_transport(transport.clone()),
    ])
    .unwrap();
    (client, transport)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn string_pairs(value: &Value) -> Vec<(String, String)> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect()
}

fn scripted_response(value: &Value) -> HttpResponse {
    let mut response = HttpResponse::new(
        value["status"].as_u64().unwrap() as u16,
        value["body"].as_str().unwrap(),
    );
    for (name, header) in string_pairs(&value["headers"]) {
        response = response.with_header(&name, &header);
    }
    response
}

// ---------------------------------------------------------------------------
// Exchanges
// ---------------------------------------------------------------------------

#[tokio::test]
async fn exchange_test_vectors() {
    let raw = include_str!("../../test-vectors/exchanges.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let base_url = vectors["base_url"].as_str().unwrap();
    let credential = vectors["credential"].as_str().unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let (client, transport) = scripted_client(base_url, credential, scripted_response(&case["response"]));

        let call = &case["request"];
        let method = parse_method(call["method"].as_str().unwrap());
        let body = call.get("body");
        let query = call.get("query");
        let result = client
            .send::<Value, Value, Value>(
                &Context::background(),
                method,
                call["path"].as_str().unwrap(),
                body,
                query,
            )
            .await;

        // Verify the request that reached the transport.
        let expected_req = &case["expected_request"];
        let seen = transport.seen.lock().unwrap().clone();
        assert_eq!(seen.len(), 1, "{name}: one request");
        let req = &seen[0];
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url.as_str(), expected_req["url"].as_str().unwrap(), "{name}: url");
        assert_eq!(req.headers, string_pairs(&expected_req["headers"]), "{name}: headers");
        assert_eq!(req.body.as_deref(), expected_req["body"].as_str(), "{name}: body");

        // Verify the outcome.
        let expected = &case["expected"];
        if let Some(error) = expected.get("error") {
            let err = result.expect_err(name);
            let api = err.api().unwrap_or_else(|| panic!("{name}: expected structured error"));
            assert_eq!(u64::from(api.status), error["status"].as_u64().unwrap(), "{name}: status");
            assert_eq!(api.message, error["message"].as_str().unwrap(), "{name}: message");
            let temporary = (
                error["temporary"][0].as_bool().unwrap(),
                error["temporary"][1].as_str().unwrap().to_string(),
            );
            assert_eq!(err.temporary(), temporary, "{name}: temporary");
            assert_eq!(err.timeout(), error["timeout"].as_bool().unwrap(), "{name}: timeout");
            assert_eq!(toggl_core::is_temporary(&err), temporary, "{name}: is_temporary");
        } else if expected.get("none").is_some() {
            assert_eq!(result.unwrap(), None, "{name}: none");
        } else {
            let value = result.unwrap().unwrap_or_else(|| panic!("{name}: expected a value"));
            assert_eq!(value, expected["value"], "{name}: value");
        }

        // Typed decoding leaves every other field unset.
        if case["decode_as"] == "workspace" {
            let body = scripted_response(&case["response"]).body;
            let ws: Workspace = decode_body(&body).unwrap().unwrap();
            let reencoded: Value = serde_json::from_str(&encode_body(&ws).unwrap()).unwrap();
            assert_eq!(reencoded, expected["value"], "{name}: typed decode");
            assert_eq!(ws.organization_id, None);
            assert_eq!(ws.at, None);
        }
    }
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

fn encode_typed_body(kind: &str, input: Value) -> String {
    match kind {
        "update_me" => encode_body(&serde_json::from_value::<UpdateMeRequestBody>(input).unwrap()),
        "update_workspace_user" => {
            encode_body(&serde_json::from_value::<UpdateWorkspaceUserRequestBody>(input).unwrap())
        }
        "create_time_entry" => {
            encode_body(&serde_json::from_value::<CreateTimeEntryRequestBody>(input).unwrap())
        }
        other => panic!("unknown body type: {other}"),
    }
    .unwrap()
}

fn encode_typed_query(kind: &str, input: Value) -> String {
    match kind {
        "organization_users" => {
            encode_query(&serde_json::from_value::<ListOrganizationUsersQuery>(input).unwrap())
        }
        "clients" => encode_query(&serde_json::from_value::<ListClientsQuery>(input).unwrap()),
        other => panic!("unknown query type: {other}"),
    }
    .unwrap()
}

#[test]
fn encoding_test_vectors() {
    let raw = include_str!("../../test-vectors/encoding.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["bodies"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let encoded = encode_typed_body(case["type"].as_str().unwrap(), case["input"].clone());
        assert_eq!(encoded, case["expected"].as_str().unwrap(), "{name}");
    }

    for case in vectors["queries"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let kind = case["type"].as_str().unwrap();
        let encoded = encode_typed_query(kind, case["input"].clone());
        assert_eq!(encoded, case["expected"].as_str().unwrap(), "{name}");
        // determinism
        assert_eq!(encode_typed_query(kind, case["input"].clone()), encoded, "{name}: stable");
    }
}

// ---------------------------------------------------------------------------
// Batch delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn batch_delete_test_vectors() {
    let raw = include_str!("../../test-vectors/batch_delete.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let projects: Vec<legacy::Project> = case["ids"]
            .as_array()
            .unwrap()
            .iter()
            .map(|id| legacy::Project {
                id: id.as_i64(),
                ..Default::default()
            })
            .collect();

        let (client, transport) =
            scripted_client("https://api.track.toggl.com/", "token", HttpResponse::new(200, ""));
        let result = client
            .v8()
            .delete_projects(Some(&Context::background()), &projects)
            .await;
        let seen = transport.seen.lock().unwrap().clone();

        match case.get("expected_path").and_then(Value::as_str) {
            Some(path) => {
                result.unwrap_or_else(|e| panic!("{name}: {e}"));
                assert_eq!(seen.len(), 1, "{name}");
                assert_eq!(seen[0].method, HttpMethod::Delete, "{name}");
                assert_eq!(seen[0].url.path(), path, "{name}");
            }
            None => {
                assert_eq!(case["expected_sentinel"], "ProjectNotFound");
                let err = result.expect_err(name);
                assert!(err == Sentinel::ProjectNotFound, "{name}");
                assert!(seen.is_empty(), "{name}: transport untouched");
            }
        }
    }
}
