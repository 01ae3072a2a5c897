use std::time::Duration;

use cosmic_guidance::session::choose;
use cosmic_guidance::{catalog, GuidanceClient, GuidanceConfig, Phase, Session, SessionStore};
use serde_json::json;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn offline_client() -> GuidanceClient {
    GuidanceClient::new(
        GuidanceConfig::with_relay("http://127.0.0.1:9/v1/chat/completions")
            .timeout(Duration::from_secs(2)),
    )
}

#[tokio::test]
async fn test_consultation_always_reveals_guidance() {
    let client = offline_client();
    let mut session = Session::new();

    assert!(!session.submit_dilemma("  "));
    assert_eq!(session.phase(), Phase::Intake);

    assert!(session.submit_dilemma("I feel lost"));
    assert_eq!(session.phase(), Phase::Preparing);
    assert!(session.finish_preparing());
    assert_eq!(session.paths().len(), 14);

    assert!(choose(&mut session, 3, &client).await);
    assert!(!choose(&mut session, 5, &client).await);

    assert_eq!(session.phase(), Phase::Reveal);
    assert_eq!(session.selected_index(), Some(3));
    let guidance = session.guidance().unwrap();
    assert_eq!(guidance.path_id, session.paths()[3].id);
    assert!(guidance.is_fallback());
}

#[tokio::test]
async fn test_every_path_reveals_matching_guidance() {
    let client = offline_client();
    for index in 0..catalog::PATH_COUNT {
        let mut session = Session::new();
        session.submit_dilemma("Should I change jobs?");
        session.finish_preparing();
        assert!(choose(&mut session, index, &client).await);
        assert_eq!(
            session.guidance().map(|g| g.path_id),
            session.selected_path().map(|p| p.id)
        );
    }
}

#[tokio::test]
async fn test_reset_during_generation_discards_late_guidance() {
    let relay = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "choices": [{ "message": { "content": "Too late." } }] }))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&relay)
        .await;
    let client = GuidanceClient::new(
        GuidanceConfig::with_relay(format!("{}/v1/chat/completions", relay.uri()))
            .models(vec!["oracle/slow".to_string()]),
    );

    let store = SessionStore::new(Duration::from_secs(60), 10);
    let mut session = Session::new();
    session.submit_dilemma("I feel lost");
    session.finish_preparing();
    let id = store.insert(session).await;

    let ticket = store.with_session(&id, |s| s.select(0)).await.unwrap().unwrap();
    let in_flight = {
        let client = client.clone();
        let ticket = ticket.clone();
        tokio::spawn(async move { client.generate(&ticket.path, &ticket.dilemma).await })
    };

    // The seeker starts over while the relay is still thinking.
    store
        .with_session(&id, |session| {
            assert!(session.reset());
            session.submit_dilemma("A different question");
            session.finish_preparing();
        })
        .await
        .unwrap();

    let guidance = in_flight.await.unwrap();
    assert_eq!(guidance.text, "Too late.");

    let applied = store
        .with_session(&id, |session| session.apply_guidance(&ticket, guidance))
        .await;
    assert_eq!(applied, Some(false));

    let session = store.snapshot(&id).await.unwrap();
    assert_eq!(session.phase(), Phase::Selection);
    assert_eq!(session.dilemma(), "A different question");
    assert!(session.selected_index().is_none());
    assert!(session.guidance().is_none());
}
