use std::time::Duration;

use sdg_chat::api::{ChatClient, HttpChatClient};
use sdg_chat::core::action::{Action, Effect, update};
use sdg_chat::core::clock::{Clock, ManualClock};
use sdg_chat::core::config::{FallbackRelease, ResolvedConfig};
use sdg_chat::core::message::{CopyState, Role};
use sdg_chat::core::state::{App, Phase};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

// ============================================================================
// Helper Functions
// ============================================================================

/// Drives an App the way the terminal host does: the clock is sampled and
/// ticked in before every action, and request effects go to a real client.
struct Host {
    app: App,
    clock: ManualClock,
    client: HttpChatClient,
}

impl Host {
    fn new(server: &MockServer, config: ResolvedConfig) -> Self {
        Self {
            app: App::from_config(&config),
            clock: ManualClock::new(),
            client: HttpChatClient::new(format!("{}/chat", server.uri())),
        }
    }

    fn dispatch(&mut self, action: Action) -> Effect {
        update(&mut self.app, Action::Tick(self.clock.now()));
        update(&mut self.app, action)
    }

    /// Runs a request effect to completion and feeds the outcome back.
    async fn perform(&mut self, effect: Effect) {
        let Effect::SpawnRequest(message) = effect else {
            panic!("expected a request effect, got {effect:?}");
        };
        let outcome = match self.client.send(&message).await {
            Ok(reply) => Action::ResponseReceived(reply),
            Err(e) => Action::RequestFailed(e.to_string()),
        };
        self.dispatch(outcome);
    }

    fn advance(&mut self, delta: Duration) {
        self.clock.advance(delta);
        self.dispatch(Action::Tick(self.clock.now()));
    }

    fn run_until_quiet(&mut self) {
        let mut guard = 0;
        while let Some(deadline) = self.app.timers.next_deadline() {
            self.clock.set(deadline);
            self.dispatch(Action::Tick(deadline));
            guard += 1;
            assert!(guard < 100_000, "timers never settled");
        }
    }

    fn open_and_settle(&mut self) {
        self.dispatch(Action::Open);
        self.run_until_quiet();
        assert_eq!(self.app.phase, Phase::Idle);
    }

    fn last_display(&self) -> String {
        self.app
            .messages
            .last()
            .map(|m| m.display.plain_text())
            .unwrap_or_default()
    }
}

async fn mount_reply(server: &MockServer, status: u16, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

// ============================================================================
// Round Trips
// ============================================================================

#[tokio::test]
async fn test_successful_round_trip() {
    let mock_server = MockServer::start().await;
    mount_reply(&mock_server, 200, json!({ "response": "Hello **there**" })).await;

    let mut host = Host::new(&mock_server, ResolvedConfig::default());
    host.open_and_settle();
    let greeting_count = host.app.messages.len();

    let effect = host.dispatch(Action::Submit("  hi  ".into()));
    assert_eq!(effect, Effect::SpawnRequest("hi".into()));
    assert_eq!(host.app.phase, Phase::Sending);
    assert!(host.app.composer.disabled);
    assert!(host.app.thinking);
    assert_eq!(host.app.messages.len(), greeting_count + 1);
    assert_eq!(host.app.messages[greeting_count].role, Role::User);

    host.perform(effect).await;
    assert!(!host.app.thinking);
    assert!(matches!(host.app.phase, Phase::Rendering(_)));

    // Part of the way through the typewriter the session is still locked.
    host.advance(Duration::from_millis(3));
    assert!(host.app.is_processing());
    assert!(host.app.composer.disabled);

    host.run_until_quiet();
    assert_eq!(host.app.phase, Phase::Idle);
    assert!(!host.app.composer.disabled);

    let reply = host.app.messages.last().expect("reply appended");
    assert_eq!(reply.role, Role::Assistant);
    assert_eq!(reply.text, "Hello **there**");
    assert_eq!(host.last_display(), "Hello there");
    assert_eq!(reply.copy, CopyState::Ready);
    assert!(
        reply
            .display
            .lines()
            .iter()
            .flatten()
            .any(|run| run.text == "there" && run.style.bold)
    );
}

#[tokio::test]
async fn test_failed_request_shows_fallback_and_releases_after_delay() {
    let mock_server = MockServer::start().await;
    mount_reply(&mock_server, 500, json!({ "error": "boom" })).await;

    // Slow typing so the fallback render outlasts the release delay.
    let mut config = ResolvedConfig::default();
    config.timing.typing_interval = Duration::from_millis(200);
    let fallback = config.strings.fallback.clone();

    let mut host = Host::new(&mock_server, config);
    host.open_and_settle();

    let effect = host.dispatch(Action::Submit("hi".into()));
    host.perform(effect).await;
    assert!(matches!(host.app.phase, Phase::Fallback(_)));

    host.advance(Duration::from_millis(999));
    assert!(host.app.is_processing());

    host.advance(Duration::from_millis(1));
    assert_eq!(host.app.phase, Phase::Idle);
    assert!(!host.app.composer.disabled);
    let fallback_message = host.app.messages.last().expect("fallback appended");
    assert!(fallback_message.is_rendering());

    host.run_until_quiet();
    assert_eq!(host.last_display(), fallback);
}

#[tokio::test]
async fn test_failed_request_waits_for_render_when_configured() {
    let mock_server = MockServer::start().await;
    mount_reply(&mock_server, 502, json!({})).await;

    let mut config = ResolvedConfig::default();
    config.timing.typing_interval = Duration::from_millis(200);
    config.fallback_release = FallbackRelease::Render;

    let mut host = Host::new(&mock_server, config);
    host.open_and_settle();

    let effect = host.dispatch(Action::Submit("hi".into()));
    host.perform(effect).await;

    host.advance(Duration::from_millis(1500));
    assert!(host.app.is_processing());

    host.run_until_quiet();
    assert_eq!(host.app.phase, Phase::Idle);
}

#[tokio::test]
async fn test_quick_question_posts_its_text() {
    let mock_server = MockServer::start().await;
    let config = ResolvedConfig::default();
    let question = config.strings.quick_questions[1].clone();

    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({ "message": question })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "ok" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut host = Host::new(&mock_server, config);
    host.open_and_settle();

    let effect = host.dispatch(Action::QuickQuestion(1));
    host.perform(effect).await;
    host.run_until_quiet();
    assert_eq!(host.last_display(), "ok");
}

#[tokio::test]
async fn test_second_submit_while_sending_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "one" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut host = Host::new(&mock_server, ResolvedConfig::default());
    host.open_and_settle();

    let first = host.dispatch(Action::Submit("first".into()));
    let count = host.app.messages.len();
    assert_eq!(host.dispatch(Action::Submit("second".into())), Effect::None);
    assert_eq!(host.dispatch(Action::QuickQuestion(0)), Effect::None);
    assert_eq!(host.app.messages.len(), count);

    host.perform(first).await;
    host.run_until_quiet();
    assert_eq!(host.last_display(), "one");
}

#[tokio::test]
async fn test_conversation_survives_close_and_reopen() {
    let mock_server = MockServer::start().await;
    mount_reply(&mock_server, 200, json!({ "response": "kept" })).await;

    let mut host = Host::new(&mock_server, ResolvedConfig::default());
    host.open_and_settle();

    let effect = host.dispatch(Action::Submit("hi".into()));
    host.perform(effect).await;
    host.dispatch(Action::Close);
    assert!(!host.app.is_open);

    // The reply keeps typing while the widget is closed.
    host.run_until_quiet();
    assert_eq!(host.app.phase, Phase::Idle);
    let count = host.app.messages.len();

    host.dispatch(Action::Open);
    host.run_until_quiet();
    assert_eq!(host.app.messages.len(), count);
    assert_eq!(host.last_display(), "kept");
}
