use crate::RedactedSecret;

/// **VALUE**: Verifies that a secret never shows up in Debug or Display.
///
/// **WHY THIS MATTERS**: Login forms are logged at debug level; the password
/// must not reach the log file.
///
/// **BUG THIS CATCHES**: Would catch a derived Debug replacing the manual one.
#[test]
fn given_secret_when_formatted_then_value_hidden() {
    // GIVEN
    let secret = RedactedSecret::new("correct horse");

    // WHEN/THEN
    assert!(!format!("{secret:?}").contains("correct horse"));
    assert!(!format!("{secret}").contains("correct horse"));
    assert_eq!(secret.expose(), "correct horse");
}

/// **VALUE**: Verifies that direct serialization is refused.
///
/// **WHY THIS MATTERS**: Accidentally embedding the secret in a serialized
/// struct (state dumps, error payloads) must fail loudly.
///
/// **BUG THIS CATCHES**: Would catch a derived Serialize.
#[test]
fn given_secret_when_serialized_directly_then_error() {
    // GIVEN
    let secret = RedactedSecret::new("pw");

    // WHEN
    let result = serde_json::to_string(&secret);

    // THEN
    assert!(result.is_err());
}
