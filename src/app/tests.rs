use super::state::{
    App, WidgetState, CAPTURE_UNAVAILABLE_TEXT, IDLE_LABEL, PROCESSING_PLACEHOLDER,
    RECORDING_LABEL, TRANSPORT_FAILURE_TEXT,
};
use crate::chat::Sender;
use crate::client::BotReply;
use crate::exchange::ExchangeMessage;
use crate::config::AppConfig;
use clap::Parser;

fn test_config() -> AppConfig {
    let mut cfg = AppConfig::parse_from(["test-app", "--no-playback"]);
    cfg.validate().expect("defaults should be valid");
    cfg
}

fn test_app() -> App {
    App::new(test_config()).expect("app should construct")
}

fn reply(transcript: &str, response: &str) -> BotReply {
    BotReply {
        transcript: Some(transcript.to_string()),
        response: Some(response.to_string()),
        ..BotReply::default()
    }
}

fn deliver(app: &mut App, message: ExchangeMessage) {
    app.handle_exchange_message(message);
}

#[test]
fn starts_idle_with_default_label() {
    let app = test_app();
    assert_eq!(app.state(), WidgetState::Idle);
    assert_eq!(app.status_text(), IDLE_LABEL);
    assert!(app.messages().is_empty());
    assert!(app.alert_text().is_none());
}

#[test]
fn widget_state_labels_are_stable() {
    assert_eq!(WidgetState::Idle.trigger_label(), IDLE_LABEL);
    assert_eq!(WidgetState::Recording.trigger_label(), RECORDING_LABEL);
    assert_eq!(WidgetState::Processing.trigger_label(), "Processing...");
}

#[test]
fn toggle_with_unknown_device_alerts_and_stays_idle() {
    let mut cfg = test_config();
    cfg.input_device = Some("voxchat-test-no-such-device".into());
    let mut app = App::new(cfg).expect("app should construct");

    app.toggle_capture();

    assert_eq!(app.state(), WidgetState::Idle);
    assert!(!app.has_active_job());
    assert!(app.messages().is_empty());
    assert_eq!(app.alert_text(), Some(CAPTURE_UNAVAILABLE_TEXT));
}

#[test]
fn toggle_while_recording_enters_processing_with_placeholder() {
    let mut app = test_app();
    app.set_state_for_tests(WidgetState::Recording);

    app.toggle_capture();

    assert_eq!(app.state(), WidgetState::Processing);
    let messages = app.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].sender, Sender::Bot);
    assert_eq!(messages[0].text, PROCESSING_PLACEHOLDER);
}

#[test]
fn toggle_while_processing_is_ignored() {
    let mut app = test_app();
    app.set_state_for_tests(WidgetState::Processing);

    app.toggle_capture();

    assert_eq!(app.state(), WidgetState::Processing);
    assert!(app.messages().is_empty());
    assert!(!app.has_active_job());
}

#[test]
fn successful_reply_appends_user_then_bot_and_resets() {
    let mut app = test_app();
    app.set_state_for_tests(WidgetState::Recording);
    app.toggle_capture();

    deliver(&mut app, ExchangeMessage::Reply {
        reply: reply("hello", "hi there"),
        metrics: None,
    });

    let messages = app.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0].text, PROCESSING_PLACEHOLDER);
    assert_eq!(messages[0].sender, Sender::Bot);
    assert_eq!(messages[1].text, "You said: hello");
    assert_eq!(messages[1].sender, Sender::User);
    assert_eq!(messages[2].text, "hi there");
    assert_eq!(messages[2].sender, Sender::Bot);

    assert_eq!(app.state(), WidgetState::Idle);
    assert_eq!(app.status_text(), IDLE_LABEL);
    assert!(!app.playback_active());
}

#[test]
fn server_error_reply_skips_transcript_rendering() {
    let mut app = test_app();
    app.set_state_for_tests(WidgetState::Recording);
    app.toggle_capture();

    deliver(&mut app, ExchangeMessage::Reply {
        reply: BotReply {
            error: Some("bad audio".into()),
            transcript: Some("should be ignored".into()),
            response: Some("also ignored".into()),
            ..BotReply::default()
        },
        metrics: None,
    });

    let messages = app.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].sender, Sender::Bot);
    assert!(messages[1].text.contains("bad audio"));
    assert!(messages.iter().all(|m| m.sender != Sender::User));
    assert_eq!(app.state(), WidgetState::Idle);
    assert_eq!(app.status_text(), IDLE_LABEL);
}

#[test]
fn transport_failure_appends_generic_bot_line() {
    let mut app = test_app();
    app.set_state_for_tests(WidgetState::Recording);
    app.toggle_capture();

    deliver(
        &mut app,
        ExchangeMessage::TransportFailure("connection refused".into()),
    );

    let messages = app.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].text, TRANSPORT_FAILURE_TEXT);
    assert_eq!(messages[1].sender, Sender::Bot);
    assert_eq!(app.state(), WidgetState::Idle);
    assert_eq!(app.status_text(), IDLE_LABEL);
}

#[test]
fn capture_unavailable_mid_recording_alerts_without_transcript_entry() {
    let mut app = test_app();
    app.set_state_for_tests(WidgetState::Recording);

    deliver(
        &mut app,
        ExchangeMessage::CaptureUnavailable("stream died".into()),
    );

    assert!(app.messages().is_empty());
    assert_eq!(app.alert_text(), Some(CAPTURE_UNAVAILABLE_TEXT));
    assert_eq!(app.state(), WidgetState::Idle);
    assert_eq!(app.status_text(), IDLE_LABEL);
}

#[test]
fn next_toggle_clears_previous_alert() {
    let mut app = test_app();
    app.set_state_for_tests(WidgetState::Recording);
    deliver(
        &mut app,
        ExchangeMessage::CaptureUnavailable("stream died".into()),
    );
    assert!(app.alert_text().is_some());

    // Toggling from Processing is ignored but still clears stale alerts.
    app.set_state_for_tests(WidgetState::Processing);
    app.toggle_capture();
    assert!(app.alert_text().is_none());
}

#[test]
fn reply_with_missing_fields_renders_empty_lines() {
    let mut app = test_app();
    app.set_state_for_tests(WidgetState::Recording);
    app.toggle_capture();

    deliver(&mut app, ExchangeMessage::Reply {
        reply: BotReply::default(),
        metrics: None,
    });

    let messages = app.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1].text, "You said: ");
    assert_eq!(messages[2].text, "");
    assert_eq!(app.state(), WidgetState::Idle);
}

#[test]
fn reply_audio_is_skipped_when_playback_disabled() {
    let mut app = test_app();
    app.set_state_for_tests(WidgetState::Recording);
    app.toggle_capture();

    deliver(&mut app, ExchangeMessage::Reply {
        reply: BotReply {
            transcript: Some("hello".into()),
            response: Some("hi".into()),
            audio_base64: Some("AAAA".into()),
            ..BotReply::default()
        },
        metrics: None,
    });

    assert!(!app.playback_active());
    assert_eq!(app.state(), WidgetState::Idle);
}

#[test]
fn every_outcome_branch_converges_on_idle() {
    let outcomes = [
        ExchangeMessage::Reply {
            reply: reply("a", "b"),
            metrics: None,
        },
        ExchangeMessage::Reply {
            reply: BotReply {
                error: Some("boom".into()),
                ..BotReply::default()
            },
            metrics: None,
        },
        ExchangeMessage::TransportFailure("offline".into()),
        ExchangeMessage::CaptureUnavailable("no mic".into()),
    ];
    for outcome in outcomes {
        let mut app = test_app();
        app.set_state_for_tests(WidgetState::Processing);
        deliver(&mut app, outcome);
        assert_eq!(app.state(), WidgetState::Idle);
        assert_eq!(app.status_text(), IDLE_LABEL);
    }
}

#[test]
fn animation_only_advances_outside_idle() {
    let mut app = test_app();
    app.advance_animation();
    assert_eq!(app.spinner_tick(), 0);

    app.set_state_for_tests(WidgetState::Processing);
    app.advance_animation();
    app.advance_animation();
    assert_eq!(app.spinner_tick(), 2);
}

#[test]
fn logging_disabled_is_a_noop() {
    super::set_logging_for_tests(false, false);
    crate::log_debug("dropped when logging is off");
    crate::log_debug_content("also dropped");
}

#[test]
fn redraw_request_is_taken_once() {
    let mut app = test_app();
    assert!(app.take_redraw_request());
    assert!(!app.take_redraw_request());
    app.request_redraw();
    assert!(app.take_redraw_request());
}
