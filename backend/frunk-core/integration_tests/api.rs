use crate::helpers::{note_json, page_json, start, start_truncating};

use common::{Credentials, NoteDraft, NoteQuery};
use frunk_core::api::ApiClient;
use frunk_core::error::ApiError;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

/// **VALUE**: Verifies the session cookie from login is sent on later requests.
///
/// **WHY THIS MATTERS**: Every notes request is authenticated by that cookie;
/// without a cookie jar the user is logged out after the first call.
///
/// **BUG THIS CATCHES**: Would catch the client being built without a cookie store.
#[tokio::test]
async fn given_login_sets_cookie_when_me_called_then_cookie_sent() {
    // GIVEN: A login endpoint that sets a session cookie
    let (server, api) = start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "a@b.c", "password": "hunter22" })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "session=abc123; Path=/")
                .set_body_json(json!({ "user": { "id": 1, "email": "a@b.c" } })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("cookie", "session=abc123"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "user": { "id": 1, "email": "a@b.c" } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    // WHEN: Logging in, then asking who we are
    let user = api.login(&Credentials::new("a@b.c", "hunter22")).await.unwrap();
    let me = api.me().await.unwrap();

    // THEN: Both see the same user
    assert_eq!(user.email, "a@b.c");
    assert_eq!(me, user);
}

/// **VALUE**: Verifies failed POSTs carry the body's `error` field as the message.
///
/// **WHY THIS MATTERS**: "Email already registered" is what the user needs to
/// see, not a status code.
///
/// **BUG THIS CATCHES**: Would catch the raw JSON body being shown instead.
#[tokio::test]
async fn given_post_failure_with_error_field_when_sent_then_message_extracted() {
    let (server, api) = start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "Email already registered" })),
        )
        .mount(&server)
        .await;

    let error = api
        .register(&Credentials::new("a@b.c", "pw"))
        .await
        .unwrap_err();

    assert_eq!(error.status_code(), Some(400));
    assert_eq!(error.user_message(), "Email already registered");
}

/// **VALUE**: Verifies a POST failure without a JSON `error` falls back to a fixed message.
///
/// **BUG THIS CATCHES**: Would catch an HTML error page being shown in the banner.
#[tokio::test]
async fn given_post_failure_without_json_when_sent_then_fallback_message() {
    let (server, api) = start().await;
    Mock::given(method("POST"))
        .and(path("/api/notes/"))
        .respond_with(ResponseTemplate::new(400).set_body_string("<html>bad</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let error = api.create_note(&NoteDraft::default()).await.unwrap_err();

    assert_eq!(error.user_message(), "error");
}

/// **VALUE**: Verifies failed non-POST requests carry the body text.
///
/// **BUG THIS CATCHES**: Would catch the POST-only `error` extraction applied to every method.
#[tokio::test]
async fn given_delete_failure_when_sent_then_body_text_is_message() {
    let (server, api) = start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/notes/5"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Note not found"))
        .mount(&server)
        .await;

    let error = api.delete_note(5).await.unwrap_err();

    assert_eq!(error.status_code(), Some(404));
    assert_eq!(error.user_message(), "Note not found");
}

/// **VALUE**: Verifies a 401 is recognised as "not logged in".
///
/// **WHY THIS MATTERS**: The session check on startup routes to the login
/// view on exactly this condition.
///
/// **BUG THIS CATCHES**: Would catch 401s being retried or treated as outages.
#[tokio::test]
async fn given_no_session_when_me_called_then_auth_required() {
    let (server, api) = start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "Unauthorized" })))
        .expect(1)
        .mount(&server)
        .await;

    let error = api.me().await.unwrap_err();

    assert!(error.is_auth_required());
    assert!(!error.is_retryable());
}

/// **VALUE**: Verifies GETs are retried on transient statuses.
///
/// **WHY THIS MATTERS**: A server restart should not empty the note list.
///
/// **BUG THIS CATCHES**: Would catch the backoff loop giving up after one attempt.
#[tokio::test]
async fn given_transient_failure_when_listing_tags_then_retried() {
    let (server, api) = start().await;
    Mock::given(method("GET"))
        .and(path("/api/notes/tags"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/notes/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "work", "color": "#ff0000", "note_count": 2 }
        ])))
        .mount(&server)
        .await;

    let tags = api.list_tags().await.unwrap();

    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].note_count, 2);
}

/// **VALUE**: Verifies writes are never retried.
///
/// **WHY THIS MATTERS**: Retrying a POST could create the same note twice.
///
/// **BUG THIS CATCHES**: Would catch the retry loop being applied to every method.
#[tokio::test]
async fn given_transient_failure_when_creating_note_then_not_retried() {
    let (server, api) = start().await;
    Mock::given(method("POST"))
        .and(path("/api/notes/"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let result = api.create_note(&NoteDraft::default()).await;

    assert!(result.is_err());
}

/// **VALUE**: Verifies the list query carries search, tag filter, and paging.
///
/// **BUG THIS CATCHES**: Would catch a filter being dropped from the query string.
#[tokio::test]
async fn given_filters_when_listing_notes_then_query_params_sent() {
    let (server, api) = start().await;
    Mock::given(method("GET"))
        .and(path("/api/notes/"))
        .and(query_param("search", "milk"))
        .and(query_param("tag_id", "3"))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "10"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_json(vec![note_json(1, "Groceries", "milk")], 2, 2, 11)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let query = NoteQuery::new(2, 10).with_search("milk").with_tag(Some(3));
    let page = api.list_notes(&query).await.unwrap();

    assert_eq!(page.notes[0].title, "Groceries");
    assert_eq!(page.pagination().page, 2);
}

/// **VALUE**: Verifies an unreachable server is reported as a network failure.
///
/// **WHY THIS MATTERS**: Transport failures get the generic banner, not a
/// misleading server message.
///
/// **BUG THIS CATCHES**: Would catch connection errors classified as HTTP failures.
#[tokio::test]
async fn given_unreachable_server_when_request_sent_then_network_error() {
    // GIVEN: A port nothing listens on
    let api = ApiClient::new("http://127.0.0.1:9/api").unwrap();

    // WHEN: Sending a write
    let error = api.toggle_pin(1).await.unwrap_err();

    // THEN: Network error with the generic message
    assert!(matches!(error, ApiError::Network { .. }));
    assert_eq!(error.user_message(), "Network error");
}

/// **VALUE**: Verifies a failure response whose body cannot be read is a network error.
///
/// **WHY THIS MATTERS**: A connection dropped mid-body is a transport problem;
/// the user should see the network banner, not an empty server message.
///
/// **BUG THIS CATCHES**: Would catch the body read error being swallowed into
/// a `Request` error with a blank or fallback message.
#[tokio::test]
async fn given_error_body_cut_short_when_request_fails_then_network_error() {
    // GIVEN: A server that hangs up partway through its 404 body
    let api = ApiClient::new(&start_truncating("404 Not Found").await).unwrap();

    // WHEN: Deleting a note (raw body text path)
    let error = api.delete_note(7).await.unwrap_err();

    // THEN: The read failure surfaces as a network error
    assert!(matches!(error, ApiError::Network { .. }), "{error:?}");
    assert_eq!(error.user_message(), "Network error");
}
