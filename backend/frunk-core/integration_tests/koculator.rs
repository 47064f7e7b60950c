use crate::helpers::{start, start_truncating};

use frunk_core::api::{ApiClient, Evaluation};
use frunk_core::error::ApiError;
use frunk_core::koculator::Koculator;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

const CALC_PATH: &str = "/api/tools/koculator/calc";

/// **VALUE**: Verifies integer and float results are displayed in their natural form.
///
/// **WHY THIS MATTERS**: `2+3` must show `5`, not `5.0`.
///
/// **BUG THIS CATCHES**: Would catch every number being formatted as a float.
#[tokio::test]
async fn given_numeric_results_when_calculated_then_displayed_naturally() {
    let (server, api) = start().await;
    Mock::given(method("POST"))
        .and(path(CALC_PATH))
        .and(body_json(json!({ "expr": "2+3" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "result": 5 })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(CALC_PATH))
        .and(body_json(json!({ "expr": "5/2" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "result": 2.5 })),
        )
        .mount(&server)
        .await;

    assert_eq!(api.calc("2+3").await.unwrap(), Evaluation::Value("5".into()));
    assert_eq!(api.calc("5/2").await.unwrap(), Evaluation::Value("2.5".into()));
}

/// **VALUE**: Verifies the evaluator's HTTP 400 rejection is an evaluation error, not a failure.
///
/// **WHY THIS MATTERS**: The server reports syntax and math errors with a 400
/// status; treating that as a transport problem would show "Network error".
///
/// **BUG THIS CATCHES**: Would catch non-2xx bodies being discarded.
#[tokio::test]
async fn given_evaluator_rejection_when_equals_then_error_shown_inline() {
    // GIVEN: An evaluator that rejects the expression
    let (server, api) = start().await;
    Mock::given(method("POST"))
        .and(path(CALC_PATH))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "ok": false, "error": "Division by zero" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    // WHEN: "1/0" is submitted
    let mut calc = Koculator::new();
    for key in "1/0".chars() {
        calc.append(key);
    }
    calc.equals(&api).await;

    // THEN: The message is shown inline with the error flag
    assert_eq!(calc.result(), "Error: Division by zero");
    assert!(calc.has_error());
}

/// **VALUE**: Verifies an empty expression never reaches the server.
///
/// **BUG THIS CATCHES**: Would catch whitespace-only expressions being submitted.
#[tokio::test]
async fn given_empty_expression_when_equals_then_no_request() {
    let (server, api) = start().await;
    Mock::given(method("POST"))
        .and(path(CALC_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut calc = Koculator::new();

    assert!(!calc.equals(&api).await);
}

/// **VALUE**: Verifies a server crash on evaluation is a request failure.
///
/// **BUG THIS CATCHES**: Would catch arbitrary 5xx bodies being parsed as rejections.
#[tokio::test]
async fn given_server_crash_when_calculated_then_request_error() {
    let (server, api) = start().await;
    Mock::given(method("POST"))
        .and(path(CALC_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let error = api.calc("1+1").await.unwrap_err();

    assert_eq!(error.status_code(), Some(500));
}

/// **VALUE**: Verifies a rejected calculation whose body is cut off is a network error.
///
/// **BUG THIS CATCHES**: Would catch an unreadable 400 body being treated as a
/// server error with the fallback message.
#[tokio::test]
async fn given_calc_error_body_cut_short_when_calculated_then_network_error() {
    let api = ApiClient::new(&start_truncating("400 Bad Request").await).unwrap();

    let error = api.calc("1+").await.unwrap_err();

    assert!(matches!(error, ApiError::Network { .. }), "{error:?}");
}
