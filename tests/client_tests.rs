
use std::time::Duration;

use booking_backend::client::{BookingClient, FormState};
use test_utils::TestApp;

fn fill_valid_draft(client: &mut BookingClient) {
    client.draft.name = "Ada Lovelace".into();
    client.draft.email = "ada@example.com".into();
    client.draft.message = "I'd like to book you for a festival slot in June.".into();
}

#[tokio::test]
async fn error_then_success_round_trip() {
    let app = TestApp::spawn().await;
    let mut client = BookingClient::new(app.address.clone());

    assert_eq!(*client.state(), FormState::Idle);

    // First attempt with a bad address: server rejects, fields survive.
    fill_valid_draft(&mut client);
    client.draft.email = "not-an-email".into();

    match client.submit().await {
        FormState::Error { message } => assert_eq!(message, "Invalid payload."),
        other => panic!("expected error state, got {:?}", other),
    }
    assert_eq!(client.draft.name, "Ada Lovelace");
    assert_eq!(client.draft.email, "not-an-email");

    // startedAt was stamped on the first attempt, so by now the elapsed-time
    // floor is satisfied and the corrected resubmit really dispatches.
    tokio::time::sleep(Duration::from_millis(2_000)).await;
    client.draft.email = "ada@example.com".into();

    match client.submit().await {
        FormState::Success { message } => {
            assert_eq!(message, "Message sent. Thanks — I'll reply soon.")
        }
        other => panic!("expected success state, got {:?}", other),
    }

    // Only success clears the form.
    assert!(client.draft.name.is_empty());
    assert!(client.draft.message.is_empty());

    let sent = app.outbox.sent.lock();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].reply_to, "ada@example.com");
}

#[tokio::test]
async fn immediate_submit_is_absorbed_but_reads_as_success() {
    let app = TestApp::spawn().await;
    let mut client = BookingClient::new(app.address.clone());

    // startedAt is stamped on this very submit, so the server treats it as
    // bot-fast and absorbs it, still presenting success to the user.
    fill_valid_draft(&mut client);
    match client.submit().await {
        FormState::Success { message } => assert_eq!(message, "Thanks!"),
        other => panic!("expected success state, got {:?}", other),
    }

    assert!(app.outbox.sent.lock().is_empty());
}

#[tokio::test]
async fn unreachable_server_maps_to_error_state() {
    let mut client = BookingClient::new("http://127.0.0.1:1");

    fill_valid_draft(&mut client);
    match client.submit().await {
        FormState::Error { message } => assert!(message.contains("Network error")),
        other => panic!("expected error state, got {:?}", other),
    }

    // The draft survives a failed attempt.
    assert_eq!(client.draft.name, "Ada Lovelace");
}
