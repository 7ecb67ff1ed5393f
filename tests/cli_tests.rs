use clap::Parser;
use field_detection::cli::commands::{
    CliError, FillArgs, OutputFormat, cmd_fill, load_inbox, mask_filled_value, render_fill,
    run_fill,
};
use field_detection::cli::config::{AppConfig, Cli, Commands, build_fill_options, load_config};
use field_detection::fill::outcome::FillAttemptOutcome;
use field_detection::leak::heuristic::assess_inbox;
use field_detection::page::{
    page_model::ElementDescriptor,
    snapshot::SnapshotPage,
};

mod common;
use common::utils::{email_input, fixture};

// ============================================================================
// CLI Argument Parsing Tests
// ============================================================================

#[test]
fn cli_parse_fill_minimal() {
    let cli = Cli::parse_from([
        "field-detection",
        "fill",
        "--page",
        "page.yaml",
        "--value",
        "a@maildrop.cc",
    ]);
    match cli.command {
        Commands::Fill {
            page,
            value,
            max_retries,
            no_frames,
            wait_for_visible,
            format,
            trace,
            mask,
            ..
        } => {
            assert_eq!(page, "page.yaml");
            assert_eq!(value, "a@maildrop.cc");
            assert_eq!(max_retries, None);
            assert!(!no_frames);
            assert_eq!(wait_for_visible, None);
            assert_eq!(format, "console");
            assert!(trace.is_none());
            assert!(!mask);
        }
        _ => panic!("Expected Fill command"),
    }
}

#[test]
fn cli_parse_fill_all_args() {
    let cli = Cli::parse_from([
        "field-detection",
        "-vv",
        "--config",
        "custom.yaml",
        "fill",
        "--page",
        "page.json",
        "--value",
        "a@maildrop.cc",
        "--max-retries",
        "3",
        "--retry-delay-ms",
        "100",
        "--no-frames",
        "--wait-for-visible",
        "false",
        "--format",
        "json",
        "--trace",
        "trace.jsonl",
        "--mask",
    ]);
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.config.as_deref(), Some("custom.yaml"));
    match cli.command {
        Commands::Fill {
            max_retries,
            retry_delay_ms,
            no_frames,
            wait_for_visible,
            format,
            trace,
            mask,
            ..
        } => {
            assert_eq!(max_retries, Some(3));
            assert_eq!(retry_delay_ms, Some(100));
            assert!(no_frames);
            assert_eq!(wait_for_visible, Some(false));
            assert_eq!(format, "json");
            assert_eq!(trace.as_deref(), Some("trace.jsonl"));
            assert!(mask);
        }
        _ => panic!("Expected Fill command"),
    }
}

#[test]
fn cli_parse_leak_and_mask() {
    let cli = Cli::parse_from([
        "field-detection",
        "leak",
        "--website",
        "example.com",
        "--inbox",
        "inbox.json",
    ]);
    assert!(matches!(cli.command, Commands::Leak { .. }));

    let cli = Cli::parse_from(["field-detection", "mask"]);
    match cli.command {
        Commands::Mask { input, domain } => {
            assert!(input.is_none());
            assert!(domain.is_none());
        }
        _ => panic!("Expected Mask command"),
    }
}

#[test]
fn cli_rejects_missing_value() {
    let result = Cli::try_parse_from(["field-detection", "fill", "--page", "page.yaml"]);
    assert!(result.is_err());
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn missing_config_falls_back_to_defaults() {
    let config = load_config(Some("/nonexistent/field-detection.yaml"));
    assert_eq!(config.fill.max_retries, 10);
    assert_eq!(config.fill.retry_delay_ms, 500);
    assert_eq!(config.masking.domain, "maildrop.cc");
    assert!(config.trace.path.is_none());
}

#[test]
fn config_file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("field-detection.yaml");
    std::fs::write(
        &path,
        "fill:\n  max_retries: 4\n  extra_patterns: ['courriel']\nmasking:\n  domain: mail.tm\n",
    )
    .unwrap();

    let config = load_config(path.to_str());
    assert_eq!(config.fill.max_retries, 4);
    assert_eq!(config.fill.retry_delay_ms, 500, "unset keys keep defaults");
    assert_eq!(config.fill.extra_patterns, vec!["courriel"]);
    assert_eq!(config.masking.domain, "mail.tm");
}

#[test]
fn malformed_config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.yaml");
    std::fs::write(&path, "fill: [this is not a map").unwrap();

    let config = load_config(path.to_str());
    assert_eq!(config.fill.max_retries, 10);
}

#[test]
fn cli_flags_override_config() {
    let mut config = AppConfig::default();
    config.fill.max_retries = 4;
    config.fill.retry_delay_ms = 50;

    let options = build_fill_options(&config, Some(1), None, true, Some(false));
    assert_eq!(options.max_retries, 1);
    assert_eq!(options.retry_delay_ms, 50);
    assert!(!options.include_nested_frames);
    assert!(!options.wait_for_visible);
}

// ============================================================================
// Command Tests
// ============================================================================

#[test]
fn unknown_format_is_rejected() {
    assert!(matches!(
        OutputFormat::parse("html"),
        Err(CliError::UnknownFormat(f)) if f == "html"
    ));
    assert_eq!(OutputFormat::parse("json").unwrap(), OutputFormat::Json);
}

#[tokio::test(start_paused = true)]
async fn fill_command_reports_success_and_traces() {
    let dir = tempfile::tempdir().unwrap();
    let trace = dir.path().join("trace.jsonl");
    let args = FillArgs {
        page: fixture("signup.yaml").display().to_string(),
        value: "a@maildrop.cc".into(),
        format: "json".into(),
        trace: Some(trace.display().to_string()),
        mask: true,
        ..FillArgs::default()
    };

    let filled = cmd_fill(&args, &AppConfig::default()).await.unwrap();
    assert!(filled);
    assert_eq!(std::fs::read_to_string(&trace).unwrap().lines().count(), 3);
}

#[tokio::test(start_paused = true)]
async fn fill_command_reports_failure() {
    let args = FillArgs {
        page: fixture("reverting.json").display().to_string(),
        value: "a@maildrop.cc".into(),
        max_retries: Some(0),
        format: "console".into(),
        ..FillArgs::default()
    };
    assert!(!cmd_fill(&args, &AppConfig::default()).await.unwrap());
}

#[tokio::test]
async fn fill_command_surfaces_missing_page() {
    let args = FillArgs {
        page: "/nonexistent/page.yaml".into(),
        value: "a@maildrop.cc".into(),
        format: "console".into(),
        ..FillArgs::default()
    };
    let err = cmd_fill(&args, &AppConfig::default()).await.unwrap_err();
    assert!(matches!(err, CliError::Page(_)));
}

#[test]
fn masking_after_fill_only_applies_to_masked_domain() {
    let page = SnapshotPage::new().with_input(ElementDescriptor {
        value: "a@maildrop.cc".into(),
        ..email_input("email")
    });
    let session = mask_filled_value(&page, "a@maildrop.cc", "maildrop.cc")
        .unwrap()
        .expect("address is on the masked domain");
    assert_eq!(session.hidden_count(), 1);
    assert!(session.is_hidden(0));
    assert!(mask_filled_value(&page, "a@example.com", "maildrop.cc").unwrap().is_none());
}

#[tokio::test(start_paused = true)]
async fn masked_fill_hides_the_address_in_both_formats() {
    for format in ["console", "json"] {
        let args = FillArgs {
            page: fixture("signup.yaml").display().to_string(),
            value: "a@maildrop.cc".into(),
            format: format.into(),
            mask: true,
            ..FillArgs::default()
        };

        let (outcome, rendered) = run_fill(&args, &AppConfig::default()).await.unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.actual_value.as_deref(), Some("a@maildrop.cc"));
        assert!(rendered.contains("[Hidden Email]"), "{format}: {rendered}");
        assert!(!rendered.contains("a@maildrop.cc"), "{format}: {rendered}");
    }
}

#[tokio::test(start_paused = true)]
async fn unmasked_fill_shows_the_address() {
    let args = FillArgs {
        page: fixture("signup.yaml").display().to_string(),
        value: "a@maildrop.cc".into(),
        format: "console".into(),
        ..FillArgs::default()
    };
    let (_, rendered) = run_fill(&args, &AppConfig::default()).await.unwrap();
    assert!(rendered.contains("value: a@maildrop.cc"));
    assert!(!rendered.contains("[Hidden Email]"));
}

#[test]
fn console_and_json_rendering() {
    let outcome = FillAttemptOutcome::no_candidates().with_progress(1, 0);

    let console = render_fill(&outcome, OutputFormat::Console).unwrap();
    assert!(console.starts_with("\u{2717} FAILED  no candidates found (1 round, 0 ms)"));

    let json = render_fill(&outcome, OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["failure"], "no_candidates_found");
    assert_eq!(value["rounds"], 1);
}

#[test]
fn inbox_fixture_flags_partner_mail() {
    let messages = load_inbox(&fixture("inbox.json")).unwrap();
    assert_eq!(messages.len(), 3);

    let assessment = assess_inbox("https://shop.example.com", &messages);
    assert_eq!(assessment.messages_checked, 2);
    assert_eq!(assessment.non_matching, 1);
    assert!(assessment.possible_leak);
}

#[test]
fn unreadable_inbox_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inbox.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(matches!(load_inbox(&path), Err(CliError::InboxParse { .. })));
    assert!(matches!(
        load_inbox(&dir.path().join("missing.json")),
        Err(CliError::Read { .. })
    ));
}
