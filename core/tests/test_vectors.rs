//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Request bodies are compared as parsed JSON so
//! field order does not matter.

use serde_json::Value;
use tool_tracker_core::{
    ApiError, CreateTool, Event, EventQuery, HttpMethod, HttpRequest, HttpResponse, Tool,
    ToolAction, ToolActionResponse, ToolQuery, TrackerClient,
};

const BASE_URL: &str = "http://localhost:8080/api";

fn client() -> TrackerClient {
    TrackerClient::new(BASE_URL)
}

fn load(raw: &str) -> Vec<Value> {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
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

/// Compare a built request with `expected_request`. Headers are only checked
/// when the vector lists them; a missing `body` means the request has none.
fn check_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.path, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: path");

    if let Some(headers) = expected.get("headers") {
        let expected_headers: Vec<(String, String)> = headers
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");
    }

    match expected.get("body") {
        Some(body) => {
            let req_body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&req_body, body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

/// `expected_error` is either a variant name or an `{status, message}` object.
fn check_error(name: &str, err: ApiError, expected: &Value) {
    match expected {
        Value::String(kind) => match kind.as_str() {
            "NotFound" => assert_eq!(err, ApiError::NotFound, "{name}"),
            "DeserializationError" => {
                assert!(matches!(err, ApiError::DeserializationError(_)), "{name}: {err:?}")
            }
            other => panic!("{name}: unknown expected_error: {other}"),
        },
        Value::Object(_) => assert_eq!(
            err,
            ApiError::HttpError {
                status: expected["status"].as_u64().unwrap() as u16,
                message: expected["message"].as_str().unwrap().to_string(),
            },
            "{name}"
        ),
        other => panic!("{name}: malformed expected_error: {other}"),
    }
}

fn page(input: &Value) -> (Option<u32>, Option<u32>) {
    let field = |key: &str| input.get(key).and_then(Value::as_u64).map(|v| v as u32);
    (field("limit"), field("offset"))
}

fn text(input: &Value, key: &str) -> Option<String> {
    input.get(key).and_then(Value::as_str).map(str::to_string)
}

// ---------------------------------------------------------------------------
// Tools
// ---------------------------------------------------------------------------

#[test]
fn list_tools_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/list_tools.json")) {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];
        let (limit, offset) = page(input);
        let query = ToolQuery {
            limit,
            offset,
            status: text(input, "status").map(|s| s.parse().unwrap()),
        };

        let req = c.build_list_tools(&query).unwrap();
        check_request(name, &req, &case["expected_request"]);

        let tools = c.parse_tools(simulated(&case)).unwrap();
        let expected: Vec<Tool> = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(tools, expected, "{name}: parsed result");
    }
}

#[test]
fn create_tool_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/create_tool.json")) {
        let name = case["name"].as_str().unwrap();
        let input: CreateTool = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_create_tool(&input).unwrap();
        check_request(name, &req, &case["expected_request"]);

        let tool = c.parse_tool(simulated(&case)).unwrap();
        let expected: Tool = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(tool, expected, "{name}: parsed result");
    }
}

#[test]
fn get_tool_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/get_tool.json")) {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_str().unwrap();

        let req = c.build_get_tool(id);
        check_request(name, &req, &case["expected_request"]);

        let result = c.parse_tool(simulated(&case));
        if let Some(expected_error) = case.get("expected_error") {
            check_error(name, result.unwrap_err(), expected_error);
        } else {
            let expected: Tool = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

#[test]
fn tool_action_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/tool_actions.json")) {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_str().unwrap();
        let input: ToolAction = serde_json::from_value(case["input"].clone()).unwrap();

        let req = match case["action"].as_str().unwrap() {
            "checkout" => c.build_checkout_tool(id, &input),
            "checkin" => c.build_checkin_tool(id, &input),
            "lost" => c.build_mark_tool_lost(id, &input),
            "maintenance" => c.build_send_tool_to_maintenance(id, &input),
            other => panic!("{name}: unknown action: {other}"),
        }
        .unwrap();
        check_request(name, &req, &case["expected_request"]);

        let result = c.parse_tool_action(simulated(&case));
        if let Some(expected_error) = case.get("expected_error") {
            check_error(name, result.unwrap_err(), expected_error);
        } else {
            let expected: ToolActionResponse =
                serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[test]
fn list_events_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/list_events.json")) {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];
        let (limit, offset) = page(input);
        let query = EventQuery {
            limit,
            offset,
            kind: text(input, "type").map(|s| s.parse().unwrap()),
            tool_id: text(input, "tool_id"),
            user_id: text(input, "user_id"),
        };

        let req = c.build_list_events(&query).unwrap();
        check_request(name, &req, &case["expected_request"]);

        let events = c.parse_events(simulated(&case)).unwrap();
        let expected: Vec<Event> = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(events, expected, "{name}: parsed result");
    }
}
