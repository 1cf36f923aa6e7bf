//! Focused unit tests covering CLI configuration and command output.

use super::helpers::{StubRegistryBuilder, invoke};
use super::*;
use crate::config::{ARG_TIMEOUT_SECS, SourceConfig, config_from_layers_for_test};
use mapfeed_core::{FetchError, SettingKey, SettingValue};
use ortho_config::MergeComposer;
use rstest::rstest;
use serde_json::{Value, json};
use std::time::Duration;

#[rstest]
fn converting_empty_args_keeps_defaults() {
    let config = SourceConfig::try_from(SourceArgs::default()).expect("defaults convert");
    assert!(config.overrides.is_empty());
    assert_eq!(config.http, mapfeed_data::HttpClientConfig::default());
    assert_eq!(config.districts, mapfeed_data::BergenskartConfig::default());
}

#[rstest]
fn converting_maps_every_setting_flag() {
    let args = SourceArgs {
        zone_source_url: Some("https://example.com/zones".to_owned()),
        enable_zone_source: Some(false),
        enable_school_door_source: Some(true),
        school_door_source_url: Some("https://example.com/doors".to_owned()),
        timeout_secs: Some(5),
        user_agent: Some("mapfeed-test".to_owned()),
        district_wfs_url: Some("https://example.com/wfs".to_owned()),
        ..SourceArgs::default()
    };
    let config = SourceConfig::try_from(args).expect("args convert");
    assert_eq!(
        config.overrides,
        vec![
            (
                SettingKey::ZoneSourceUrl,
                SettingValue::from("https://example.com/zones")
            ),
            (SettingKey::EnableZoneSource, SettingValue::Bool(false)),
            (
                SettingKey::SchoolDoorSourceUrl,
                SettingValue::from("https://example.com/doors")
            ),
            (SettingKey::EnableSchoolDoorSource, SettingValue::Bool(true)),
        ]
    );
    assert_eq!(config.http.timeout, Duration::from_secs(5));
    assert_eq!(config.http.user_agent, "mapfeed-test");
    assert_eq!(config.districts.url, "https://example.com/wfs");
}

#[rstest]
fn converting_rejects_zero_timeout() {
    let args = SourceArgs {
        timeout_secs: Some(0),
        ..SourceArgs::default()
    };
    let err = SourceConfig::try_from(args).expect_err("zero timeout rejected");
    match err {
        CliError::ZeroTimeout { field } => assert_eq!(field, ARG_TIMEOUT_SECS),
        other => panic!("expected ZeroTimeout, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "timeout_secs": "soon" }));

    let err = config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    match err {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence() {
    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "zone_source_url": "https://from-file.example.com/zones",
            "zone_name_field": "Navn",
            "timeout_secs": 10,
        }),
        None,
    );
    composer.push_environment(json!({
        "zone_source_url": "https://from-env.example.com/zones",
        "timeout_secs": 20,
    }));
    composer.push_cli(json!({ "timeout_secs": 3 }));

    let config = config_from_layers_for_test(composer.layers()).expect("merged config builds");
    let settings = mapfeed_core::ProviderSettings::load(&config.settings());
    assert_eq!(settings.zone_source_url, "https://from-env.example.com/zones");
    assert_eq!(settings.zone_name_field, "Navn");
    assert_eq!(settings.zone_number_field, "Sonenr");
    assert_eq!(config.http.timeout, Duration::from_secs(3));
}

#[rstest]
#[case("zone")]
#[case("zones")]
#[case("School-Door")]
fn fetch_accepts_kind_spellings(#[case] kind: &str) {
    let cli = Cli::try_parse_from(["mapfeed", "fetch", kind]).expect("kind parses");
    assert!(matches!(cli.command, Command::Fetch(_)));
}

#[rstest]
fn fetch_rejects_unknown_kind() {
    let err = Cli::try_parse_from(["mapfeed", "fetch", "rivers"]).expect_err("unknown kind");
    assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
}

#[rstest]
fn fetch_prints_zones_as_json() {
    let builder = StubRegistryBuilder::new();
    let output = invoke(&["fetch", "zone"], &builder).expect("fetch succeeds");
    let parsed: Value = serde_json::from_str(&output).expect("valid JSON");
    let names: Vec<_> = parsed
        .as_array()
        .expect("array output")
        .iter()
        .filter_map(|zone| zone.get("name").and_then(Value::as_str))
        .collect();
    assert_eq!(names, vec!["Sentrum", "Fana"]);
}

#[rstest]
#[case(&["fetch", "base"])]
#[case(&["fetch", "school-door"])]
#[case(&["fetch", "zone", "--enable-zone-source", "false"])]
fn soft_misses_print_an_empty_array(#[case] args: &[&str]) {
    let builder = StubRegistryBuilder::new();
    let output = invoke(args, &builder).expect("fetch succeeds");
    assert_eq!(output.trim(), "[]");
}

#[rstest]
fn fetch_failures_name_the_kind() {
    let builder = StubRegistryBuilder::failing();
    let err = invoke(&["fetch", "zone"], &builder).expect_err("fetch fails");
    match err {
        CliError::Fetch { kind, source } => {
            assert_eq!(kind, mapfeed_core::ShapeKind::Zone);
            assert!(matches!(source, FetchError::Timeout { .. }));
        }
        other => panic!("expected Fetch error, found {other:?}"),
    }
}

#[rstest]
fn types_lists_enabled_kinds() {
    let builder = StubRegistryBuilder::new();
    let output = invoke(
        &["types", "--enable-bergenskart", "true", "--enable-zone-source", "false"],
        &builder,
    )
    .expect("types succeeds");
    assert_eq!(output, "base\nschool-district\n");
}

#[rstest]
fn status_reports_static_online_status() {
    let builder = StubRegistryBuilder::new();
    let output = invoke(&["status"], &builder).expect("status succeeds");
    let parsed: Value = serde_json::from_str(&output).expect("valid JSON");
    assert_eq!(parsed["name"], "ArcGisDataProvider");
    assert_eq!(parsed["description"], "Supplies geodata from ArcGIS sources");
    assert_eq!(parsed["is_online"], true);
    assert_eq!(parsed["response_time_ms"], 0);
    assert_eq!(parsed["message"], "OK");
}

#[rstest]
fn settings_groups_by_category_and_marks_overrides() {
    let builder = StubRegistryBuilder::new();
    let output = invoke(&["settings", "--zone-name-field", "Navn"], &builder)
        .expect("settings succeeds");
    let zones_header = output.find("[Zones]").expect("zones header");
    let doors_header = output.find("[SchoolDoors]").expect("doors header");
    assert!(zones_header < doors_header);
    assert!(output.contains("ZoneNameField = Navn (overridden)"));
    assert!(output.contains("EnableZoneSource = true\n"));
    assert!(output.contains("EnableSchoolDoorSource = false\n"));
}

#[rstest]
fn builder_receives_http_options() {
    let builder = StubRegistryBuilder::new();
    invoke(
        &["status", "--timeout-secs", "7", "--user-agent", "probe/1"],
        &builder,
    )
    .expect("status succeeds");
    let seen = builder.seen().expect("builder invoked");
    assert_eq!(seen.http.timeout, Duration::from_secs(7));
    assert_eq!(seen.http.user_agent, "probe/1");
}
