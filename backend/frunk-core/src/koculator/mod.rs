//! Koculator: the in-app calculator.
//!
//! Input is sanitized locally keystroke by keystroke; evaluation is delegated
//! to an [`Evaluate`] implementation (the server in production).

pub mod keys;
pub mod sanitizer;

pub use keys::CalcKey;

use crate::api::Evaluation;
use crate::error::api::{ApiError, NETWORK_ERROR_MESSAGE};

use std::future::Future;

use log::{debug, warn};

/// Something that can evaluate a sanitized expression.
pub trait Evaluate {
    fn evaluate(&self, expr: &str) -> impl Future<Output = Result<Evaluation, ApiError>> + Send;
}

/// Calculator display state: the expression being typed, the last result,
/// and whether that result is an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Koculator {
    expr: String,
    result: String,
    has_error: bool,
}

impl Koculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expr(&self) -> &str {
        &self.expr
    }

    pub fn result(&self) -> &str {
        &self.result
    }

    pub fn has_error(&self) -> bool {
        self.has_error
    }

    /// Apply one keystroke; returns whether it was accepted.
    pub fn append(&mut self, token: char) -> bool {
        match sanitizer::append(&self.expr, token) {
            Some(next) => {
                self.expr = next;
                self.has_error = false;
                true
            }
            None => false,
        }
    }

    pub fn backspace(&mut self) {
        self.expr = sanitizer::backspace(&self.expr);
        self.has_error = false;
    }

    pub fn clear(&mut self) {
        self.expr.clear();
        self.result.clear();
        self.has_error = false;
    }

    pub fn clear_error(&mut self) {
        self.has_error = false;
    }

    /// Submit the expression.
    ///
    /// Returns `false` without calling the evaluator when the trimmed
    /// expression is empty.
    pub async fn equals<E: Evaluate>(&mut self, evaluator: &E) -> bool {
        let expr = self.expr.trim().to_string();
        if expr.is_empty() {
            return false;
        }

        match evaluator.evaluate(&expr).await {
            Ok(Evaluation::Value(value)) => {
                debug!("{expr} = {value}");
                self.result = value;
                self.has_error = false;
            }
            Ok(Evaluation::Rejected(message)) => {
                debug!("{expr} rejected: {message}");
                self.result = format!("Error: {message}");
                self.has_error = true;
            }
            Err(e) => {
                warn!("Evaluation request failed: {e}");
                self.result = NETWORK_ERROR_MESSAGE.to_string();
                self.has_error = true;
            }
        }
        true
    }

    /// Dispatch a key press.
    pub async fn press<E: Evaluate>(&mut self, key: CalcKey, evaluator: &E) {
        match key {
            CalcKey::Input(c) => {
                self.append(c);
            }
            CalcKey::Backspace => self.backspace(),
            CalcKey::Clear => self.clear(),
            CalcKey::Equals => {
                self.equals(evaluator).await;
            }
        }
    }
}
