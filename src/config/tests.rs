use super::defaults::{DEFAULT_SERVER_URL, MAX_CAPTURE_BUFFER_MS, MIN_CAPTURE_BUFFER_MS};
use super::AppConfig;
use clap::Parser;

#[test]
fn accepts_valid_defaults() {
    let mut cfg = AppConfig::parse_from(["test-app"]);
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.server_url, DEFAULT_SERVER_URL);
}

#[test]
fn rejects_empty_server_url() {
    let mut cfg = AppConfig::parse_from(["test-app", "--server-url", "   "]);
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_server_url_without_http_scheme() {
    let mut cfg = AppConfig::parse_from(["test-app", "--server-url", "ftp://host"]);
    assert!(cfg.validate().is_err());
    let mut cfg = AppConfig::parse_from(["test-app", "--server-url", "localhost:5000"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn trims_trailing_slash_from_server_url() {
    let mut cfg = AppConfig::parse_from(["test-app", "--server-url", "http://host:5000/"]);
    cfg.validate().expect("url with trailing slash is valid");
    assert_eq!(cfg.server_url, "http://host:5000");
}

#[test]
fn accepts_https_server_url() {
    let mut cfg = AppConfig::parse_from(["test-app", "--server-url", "https://bot.example.com"]);
    assert!(cfg.validate().is_ok());
}

#[test]
fn rejects_capture_frame_out_of_bounds() {
    let mut cfg = AppConfig::parse_from(["test-app", "--capture-frame-ms", "4"]);
    assert!(cfg.validate().is_err());
    let mut cfg = AppConfig::parse_from(["test-app", "--capture-frame-ms", "121"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn accepts_capture_frame_bounds() {
    let mut cfg = AppConfig::parse_from(["test-app", "--capture-frame-ms", "5"]);
    assert!(cfg.validate().is_ok());
    let mut cfg = AppConfig::parse_from(["test-app", "--capture-frame-ms", "120"]);
    assert!(cfg.validate().is_ok());
}

#[test]
fn rejects_capture_buffer_out_of_bounds() {
    let too_small = (MIN_CAPTURE_BUFFER_MS - 1).to_string();
    let mut cfg = AppConfig::parse_from(["test-app", "--capture-buffer-ms", &too_small]);
    assert!(cfg.validate().is_err());
    let too_big = (MAX_CAPTURE_BUFFER_MS + 1).to_string();
    let mut cfg = AppConfig::parse_from(["test-app", "--capture-buffer-ms", &too_big]);
    assert!(cfg.validate().is_err());
}

#[test]
fn accepts_capture_buffer_bounds() {
    let min = MIN_CAPTURE_BUFFER_MS.to_string();
    let mut cfg = AppConfig::parse_from(["test-app", "--capture-buffer-ms", &min]);
    assert!(cfg.validate().is_ok());
    let max = MAX_CAPTURE_BUFFER_MS.to_string();
    let mut cfg = AppConfig::parse_from(["test-app", "--capture-buffer-ms", &max]);
    assert!(cfg.validate().is_ok());
}

#[test]
fn rejects_channel_capacity_out_of_bounds() {
    let mut cfg = AppConfig::parse_from(["test-app", "--capture-channel-capacity", "4"]);
    assert!(cfg.validate().is_err());
    let mut cfg = AppConfig::parse_from(["test-app", "--capture-channel-capacity", "1025"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_blank_input_device() {
    let mut cfg = AppConfig::parse_from(["test-app", "--input-device", "  "]);
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_input_device_with_control_characters() {
    let mut cfg = AppConfig::parse_from(["test-app", "--input-device", "mic\nname"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_input_device_over_max_length() {
    let long_name = "a".repeat(257);
    let mut cfg = AppConfig::parse_from(["test-app", "--input-device", &long_name]);
    assert!(cfg.validate().is_err());
}

#[test]
fn capture_config_maps_fields() {
    let mut cfg = AppConfig::parse_from([
        "test-app",
        "--capture-frame-ms",
        "10",
        "--capture-buffer-ms",
        "2000",
        "--capture-channel-capacity",
        "16",
    ]);
    cfg.validate().expect("capture settings are valid");
    let capture = cfg.capture_config();
    assert_eq!(capture.frame_ms, 10);
    assert_eq!(capture.buffer_ms, 2000);
    assert_eq!(capture.channel_capacity, 16);
}
