//! Verify request building and response parsing against JSON test vectors
//! stored in `test-vectors/`.
//!
//! Comparing parsed JSON bodies (not raw strings) avoids false negatives from
//! field-ordering differences.

use serde_json::Value;
use store_client::{parse_rows, Endpoint, Filter, HttpMethod, HttpResponse, StoreConfig, StoreError};

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PATCH" => HttpMethod::Patch,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn parse_filter(value: &Value) -> Option<Filter> {
    let pair = value.as_array()?;
    Some(Filter::eq(
        pair[0].as_str().unwrap(),
        pair[1].as_str().unwrap(),
    ))
}

fn parse_headers(value: &Value) -> Vec<(String, String)> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (
                arr[0].as_str().unwrap().to_string(),
                arr[1].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let endpoint = Endpoint::new(&StoreConfig::new(
        vectors["base_url"].as_str().unwrap(),
        vectors["key"].as_str().unwrap(),
    ))
    .unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let table = case["table"].as_str().unwrap();
        let filter = parse_filter(&case["filter"]);
        let expected = &case["expected_request"];

        let req = match case["op"].as_str().unwrap() {
            "select" => endpoint.build_select(table, filter.as_ref()),
            "insert" => endpoint.build_insert(table, &case["body"]).unwrap(),
            "update" => endpoint
                .build_update(table, filter.as_ref().unwrap(), &case["body"])
                .unwrap(),
            "delete" => endpoint.build_delete(table, filter.as_ref().unwrap()),
            other => panic!("{name}: unknown op {other}"),
        };

        assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, expected["url"].as_str().unwrap(), "{name}: url");
        assert_eq!(req.headers, parse_headers(&expected["headers"]), "{name}: headers");

        match (&req.body, &expected["body"]) {
            (None, Value::Null) => {}
            (Some(body), expected_body) => {
                let body: Value = serde_json::from_str(body).unwrap();
                assert_eq!(&body, expected_body, "{name}: body");
            }
            (None, _) => panic!("{name}: expected a body"),
        }
    }
}

#[test]
fn response_test_vectors() {
    let raw = include_str!("../../test-vectors/responses.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let response = HttpResponse {
            status: u16::try_from(case["status"].as_u64().unwrap()).unwrap(),
            body: case["body"].as_str().unwrap().to_string(),
        };
        let expected = &case["expected"];

        let result = parse_rows::<Value>(response);
        if let Some(count) = expected["rows"].as_u64() {
            let rows = result.unwrap_or_else(|e| panic!("{name}: unexpected error {e}"));
            assert_eq!(rows.len() as u64, count, "{name}: row count");
            continue;
        }

        let err = result.expect_err(name);
        match expected["error"].as_str().unwrap() {
            "status" => assert!(matches!(err, StoreError::Status { .. }), "{name}: {err:?}"),
            "decode" => assert!(matches!(err, StoreError::Decode(_)), "{name}: {err:?}"),
            other => panic!("{name}: unknown error kind {other}"),
        }
    }
}
