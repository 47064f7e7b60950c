use crate::api::Evaluation;
use crate::error::api::ApiError;
use crate::koculator::{CalcKey, Evaluate, Koculator};

use std::sync::Mutex;

/// Evaluator that answers from a script and records what it was asked.
struct ScriptedEvaluator {
    reply: fn() -> Result<Evaluation, ApiError>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedEvaluator {
    fn new(reply: fn() -> Result<Evaluation, ApiError>) -> Self {
        Self {
            reply,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Evaluate for ScriptedEvaluator {
    async fn evaluate(&self, expr: &str) -> Result<Evaluation, ApiError> {
        self.calls.lock().unwrap().push(expr.to_string());
        (self.reply)()
    }
}

fn type_into(calc: &mut Koculator, keys: &str) {
    for key in keys.chars() {
        calc.append(key);
    }
}

/// **VALUE**: Verifies pressing equals on an empty expression sends nothing.
///
/// **WHY THIS MATTERS**: An empty submission would only produce a server error.
///
/// **BUG THIS CATCHES**: Would catch the trim-and-skip check being removed.
#[tokio::test]
async fn given_blank_expression_when_equals_then_evaluator_not_called() {
    // GIVEN: A calculator with nothing typed
    let evaluator = ScriptedEvaluator::new(|| Ok(Evaluation::Value("0".into())));
    let mut calc = Koculator::new();

    // WHEN: Equals is pressed
    let submitted = calc.equals(&evaluator).await;

    // THEN: No call is made and nothing changes
    assert!(!submitted);
    assert!(evaluator.calls().is_empty());
    assert_eq!(calc.result(), "");
}

/// **VALUE**: Verifies a successful evaluation shows the result and clears the error.
///
/// **BUG THIS CATCHES**: Would catch a stale error flag surviving a good result.
#[tokio::test]
async fn given_valid_expression_when_equals_then_result_shown() {
    let evaluator = ScriptedEvaluator::new(|| Ok(Evaluation::Value("5".into())));
    let mut calc = Koculator::new();
    type_into(&mut calc, "2+3");

    assert!(calc.equals(&evaluator).await);

    assert_eq!(evaluator.calls(), vec!["2+3".to_string()]);
    assert_eq!(calc.result(), "5");
    assert!(!calc.has_error());
    // AND: The expression stays for further editing
    assert_eq!(calc.expr(), "2+3");
}

/// **VALUE**: Verifies evaluator-reported errors are shown inline with the error flag.
///
/// **WHY THIS MATTERS**: Division by zero is a user mistake, not an outage.
///
/// **BUG THIS CATCHES**: Would catch rejected expressions shown as network errors.
#[tokio::test]
async fn given_rejected_expression_when_equals_then_error_flagged() {
    let evaluator =
        ScriptedEvaluator::new(|| Ok(Evaluation::Rejected("division by zero".into())));
    let mut calc = Koculator::new();
    type_into(&mut calc, "1/0");

    calc.equals(&evaluator).await;

    assert_eq!(calc.result(), "Error: division by zero");
    assert!(calc.has_error());

    // AND: The next accepted keystroke clears the flag
    assert!(calc.append('1'));
    assert!(!calc.has_error());
}

/// **VALUE**: Verifies transport failures show the generic network message.
///
/// **BUG THIS CATCHES**: Would catch raw transport error text leaking into the display.
#[tokio::test]
async fn given_unreachable_evaluator_when_equals_then_network_error_shown() {
    let evaluator = ScriptedEvaluator::new(|| {
        Err(ApiError::Network {
            message: "connection refused".into(),
            is_timeout: false,
            is_connection: true,
            location: common::ErrorLocation::caller(),
        })
    });
    let mut calc = Koculator::new();
    type_into(&mut calc, "7");

    calc.equals(&evaluator).await;

    assert_eq!(calc.result(), "Network error");
    assert!(calc.has_error());
}

/// **VALUE**: Verifies keyboard shortcuts map onto calculator actions.
///
/// **WHY THIS MATTERS**: The calculator is usable from the keyboard alone.
///
/// **BUG THIS CATCHES**: Would catch Escape not clearing or Enter not submitting.
#[tokio::test]
async fn given_key_presses_when_dispatched_then_mapped_to_actions() {
    let evaluator = ScriptedEvaluator::new(|| Ok(Evaluation::Value("12".into())));
    let mut calc = Koculator::new();

    for key in CalcKey::from_typed("3*44") {
        calc.press(key, &evaluator).await;
    }
    calc.press(CalcKey::from_key("Backspace").unwrap(), &evaluator).await;
    assert_eq!(calc.expr(), "3*4");

    calc.press(CalcKey::from_key("Enter").unwrap(), &evaluator).await;
    assert_eq!(calc.result(), "12");

    calc.press(CalcKey::from_key("Escape").unwrap(), &evaluator).await;
    assert_eq!(calc.expr(), "");
    assert_eq!(calc.result(), "");

    // AND: Unmapped keys are ignored
    assert_eq!(CalcKey::from_key("Shift"), None);
    assert_eq!(CalcKey::from_key("x"), None);
}
