//! Keystroke-level sanitizer for calculator expressions.
//!
//! Every accepted keystroke keeps the expression plausible for the evaluator:
//! consecutive operators collapse into the latest one, `()` never appears, a
//! number never gets a second decimal point, and a bare `.` becomes `0.`.

use once_cell::sync::Lazy;
use regex::Regex;

pub const OPERATORS: [char; 4] = ['+', '-', '*', '/'];

/// Optional sign, digits, at most one point, digits; anchored at the end.
static TRAILING_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"-?\d*\.?\d*$").expect("trailing number pattern is valid")
});

pub fn is_operator(c: char) -> bool {
    OPERATORS.contains(&c)
}

fn is_value_end(c: char) -> bool {
    c.is_ascii_digit() || c == '.' || c == ')'
}

/// The numeric segment the expression currently ends with.
fn trailing_number(expr: &str) -> &str {
    TRAILING_NUMBER
        .find(expr)
        .map(|found| found.as_str())
        .unwrap_or("")
}

/// Apply one keystroke to `expr`.
///
/// Returns the new expression, or `None` when the keystroke is rejected and
/// the expression stays as it was.
pub fn append(expr: &str, token: char) -> Option<String> {
    let last = expr.chars().last();

    if is_operator(token) {
        if expr.is_empty() && token != '-' {
            return None;
        }
        if last == Some('(') && token != '-' {
            return None;
        }
        if let Some(previous) = last.filter(|c| is_operator(*c)) {
            let mut replaced = expr[..expr.len() - previous.len_utf8()].to_string();
            replaced.push(token);
            return Some(replaced);
        }
    }

    match token {
        ')' => match last {
            None => return None,
            Some(c) if is_operator(c) || c == '(' => return None,
            Some(_) => {}
        },
        '(' => {
            if last.is_some_and(is_value_end) {
                return None;
            }
        }
        '.' => {
            let number = trailing_number(expr);
            if number.contains('.') {
                return None;
            }
            let mut next = expr.to_string();
            if number.is_empty() || number == "-" {
                next.push('0');
            }
            next.push('.');
            return Some(next);
        }
        _ => {}
    }

    let mut next = expr.to_string();
    next.push(token);
    Some(next)
}

/// Drop the last character.
pub fn backspace(expr: &str) -> String {
    let mut next = expr.to_string();
    next.pop();
    next
}
