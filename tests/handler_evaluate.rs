mod common;

use common::{BROWSER, GOOGLEBOT};
use serde_json::{Value, json};

async fn evaluate(body: Value) -> Value {
    let server = common::make_server(common::create_test_state(common::es_fr_settings()));

    let response = server
        .post("/api/evaluate")
        .add_header("Authorization", common::bearer())
        .json(&body)
        .await;

    response.assert_status_ok();
    response.json::<Value>()
}

#[tokio::test]
async fn test_evaluate_redirect() {
    let json = evaluate(json!({"country": "ES", "user_agent": BROWSER})).await;

    assert_eq!(json["outcome"], "redirect");
    assert_eq!(json["country"], "ES");
    assert_eq!(json["location"], "https://example.com/es");
    assert_eq!(json["cookie_max_age"], 604_800);
    assert!(json.get("reason").is_none());
}

#[tokio::test]
async fn test_evaluate_skip_reasons() {
    let cases = [
        (json!({"country": "ES", "user_agent": BROWSER, "has_cookie": true}), "already_redirected"),
        (json!({"country": "ES", "user_agent": GOOGLEBOT}), "bot"),
        (json!({"country": "XX", "user_agent": BROWSER}), "no_matching_rule"),
        (json!({"user_agent": BROWSER}), "no_country"),
        (json!({"country": "ES", "user_agent": BROWSER, "path": "/about"}), "not_front_page"),
        (json!({"country": "ES", "user_agent": BROWSER, "path": "/api/settings"}), "admin_or_ajax"),
    ];

    for (body, reason) in cases {
        let json = evaluate(body).await;
        assert_eq!(json["outcome"], "skip");
        assert_eq!(json["reason"], reason);
        assert!(json["description"].is_string());
    }
}

#[tokio::test]
async fn test_evaluate_does_not_set_cookie() {
    let server = common::make_server(common::create_test_state(common::es_fr_settings()));

    let response = server
        .post("/api/evaluate")
        .add_header("Authorization", common::bearer())
        .json(&json!({"country": "ES", "user_agent": BROWSER}))
        .await;

    response.assert_status_ok();
    assert!(response.maybe_header("set-cookie").is_none());
}

#[tokio::test]
async fn test_evaluate_requires_token() {
    let server = common::make_server(common::create_test_state(common::es_fr_settings()));

    let response = server
        .post("/api/evaluate")
        .json(&json!({"country": "ES"}))
        .await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn test_evaluate_rejects_empty_path() {
    let server = common::make_server(common::create_test_state(common::es_fr_settings()));

    let response = server
        .post("/api/evaluate")
        .add_header("Authorization", common::bearer())
        .json(&json!({"country": "ES", "path": ""}))
        .await;

    response.assert_status_bad_request();
}
