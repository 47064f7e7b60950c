use super::ApiClient;
use crate::error::api::ApiError;
use crate::koculator::Evaluate;

use log::debug;
use reqwest::Method;
use serde::Deserialize;
use serde_json::{Value, json};

const CALC_ENDPOINT: &str = "tools/koculator/calc";
const UNKNOWN_CALC_ERROR: &str = "Unknown error";

/// What the evaluator made of an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    /// Display form of the result.
    Value(String),
    /// Syntax or math error reported by the evaluator.
    Rejected(String),
}

#[derive(Deserialize)]
struct CalcReply {
    ok: bool,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

impl CalcReply {
    fn into_evaluation(self) -> Evaluation {
        if self.ok {
            Evaluation::Value(display_result(self.result.as_ref()))
        } else {
            Evaluation::Rejected(self.error.unwrap_or_else(|| UNKNOWN_CALC_ERROR.to_string()))
        }
    }
}

/// Integers print without a fraction, everything else in shortest form.
fn display_result(result: Option<&Value>) -> String {
    match result {
        Some(Value::Number(number)) => match number.as_i64() {
            Some(integer) => integer.to_string(),
            None => number
                .as_f64()
                .map(|float| float.to_string())
                .unwrap_or_else(|| number.to_string()),
        },
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

impl ApiClient {
    /// Evaluate an expression on the server.
    ///
    /// The server answers evaluation errors with HTTP 400 and `{ok: false, error}`;
    /// those come back as [`Evaluation::Rejected`], not as an error.
    pub async fn calc(&self, expr: &str) -> Result<Evaluation, ApiError> {
        let url = self.endpoint(CALC_ENDPOINT)?;
        let response = self.send(Method::POST, url, Some(&json!({ "expr": expr }))).await?;
        let status = response.status();

        if status.is_success() {
            let reply: CalcReply = response.json().await?;
            return Ok(reply.into_evaluation());
        }

        let body = response.text().await.map_err(ApiError::unreadable_body)?;
        match serde_json::from_str::<CalcReply>(&body) {
            Ok(reply) if !reply.ok => {
                debug!("Evaluator rejected '{expr}' with HTTP {}", status.as_u16());
                Ok(reply.into_evaluation())
            }
            _ => {
                let message = serde_json::from_str::<Value>(&body)
                    .ok()
                    .and_then(|value| value.get("error").and_then(Value::as_str).map(String::from))
                    .unwrap_or_else(|| super::FALLBACK_POST_ERROR.to_string());
                Err(ApiError::request(status.as_u16(), message))
            }
        }
    }
}

impl Evaluate for ApiClient {
    async fn evaluate(&self, expr: &str) -> Result<Evaluation, ApiError> {
        self.calc(expr).await
    }
}
