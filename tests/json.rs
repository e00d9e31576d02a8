#![cfg(feature = "json")]

use mocktransport::{http::Method, prelude::*};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

mod common;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct User {
    id: u32,
    name: String,
}

#[test]
fn returns_json_body() {
    common::setup();

    let (client, mock) = mocktransport::new();

    mock.expect_method(Method::GET).return_json(&User {
        id: 1,
        name: "ferris".into(),
    });

    let mut response = client.get("http://localhost/users/1").unwrap();

    assert_eq!(response.headers()["content-type"], "application/json");
    assert_eq!(
        response.json::<User>().unwrap(),
        User {
            id: 1,
            name: "ferris".into(),
        }
    );
    mock.expectations_met().unwrap();
}

#[test]
fn expects_json_body_regardless_of_formatting() {
    common::setup();

    let (client, mock) = mocktransport::new();

    mock.expect_json(&json!({"id": 2, "name": "crab"}));

    client
        .post("http://localhost/users", "{\n  \"name\": \"crab\",\n  \"id\": 2\n}")
        .unwrap();

    mock.expectations_met().unwrap();
}

#[test]
fn unexpected_json_body_is_reported() {
    common::setup();

    let (client, mock) = mocktransport::new();

    mock.expect_json(&User {
        id: 3,
        name: "gopher".into(),
    });

    client
        .post("http://localhost/users", r#"{"id":3,"name":"ferris"}"#)
        .unwrap();

    let error = mock.expectations_met().unwrap_err();

    assert_eq!(error.interaction(), Some(1));
    assert!(error.to_string().contains("expected JSON body"));
}

#[test]
fn json_value_round_trips_through_response() {
    common::setup();

    let (client, mock) = mocktransport::new();

    mock.return_json(&json!([1, 2, 3]));

    let value: Value = client.get("http://localhost").unwrap().json().unwrap();

    assert_eq!(value, json!([1, 2, 3]));
}
