use std::io::Read;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use crate::cli::config::{AppConfig, build_fill_options};
use crate::detect::candidate::Candidate;
use crate::detect::discovery::{DiscoveryOptions, discover};
use crate::fill::orchestrator::FillInvocation;
use crate::fill::outcome::FillAttemptOutcome;
use crate::leak::heuristic::{InboxMessage, LeakAssessment, assess_inbox};
use crate::masking::session::MaskingSession;
use crate::page::error::PageError;
use crate::page::snapshot::SnapshotPage;
use crate::report::console::{format_candidates, format_fill_report, format_leak_report};
use crate::trace::logger::TraceLogger;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse inbox {path}: {source}")]
    InboxParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown output format {0:?} (expected console or json)")]
    UnknownFormat(String),

    #[error(transparent)]
    Page(#[from] PageError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Options of the `fill` subcommand as parsed from the command line.
#[derive(Debug, Clone, Default)]
pub struct FillArgs {
    pub page: String,
    pub value: String,
    pub max_retries: Option<u32>,
    pub retry_delay_ms: Option<u64>,
    pub no_frames: bool,
    pub wait_for_visible: Option<bool>,
    pub format: String,
    pub trace: Option<String>,
    pub mask: bool,
}

// ============================================================================
// fill subcommand
// ============================================================================

/// Fill the page snapshot and print the outcome. Returns whether it succeeded.
pub async fn cmd_fill(args: &FillArgs, config: &AppConfig) -> Result<bool, CliError> {
    let (outcome, rendered) = run_fill(args, config).await?;
    print!("{}", rendered);
    Ok(outcome.success)
}

/// Fill the page snapshot and render the outcome in the requested format.
///
/// With `mask` set and a successful fill on the masked domain, the rendered
/// report shows the placeholder instead of the address.
pub async fn run_fill(
    args: &FillArgs,
    config: &AppConfig,
) -> Result<(FillAttemptOutcome, String), CliError> {
    let format = OutputFormat::parse(&args.format)?;
    let page = SnapshotPage::load(Path::new(&args.page))?;
    let options = build_fill_options(
        config,
        args.max_retries,
        args.retry_delay_ms,
        args.no_frames,
        args.wait_for_visible,
    );

    let tracer = match args.trace.as_deref().or(config.trace.path.as_deref()) {
        Some(path) => TraceLogger::new(path),
        None => TraceLogger::disabled(),
    };

    let outcome = FillInvocation::new(&page, &args.value, &options)
        .with_tracer(&tracer)
        .run()
        .await;

    let masking = if args.mask && outcome.success {
        mask_filled_value(&page, &args.value, &config.masking.domain)?
    } else {
        None
    };

    let rendered = match &masking {
        Some(session) => {
            info!(hidden = session.hidden_count(), "masked filled inputs");
            render_fill(&mask_outcome(&outcome, session), format)?
        }
        None => render_fill(&outcome, format)?,
    };
    Ok((outcome, rendered))
}

/// Start a masking session for the filled address when it is on the masked
/// domain. `None` when there is nothing to hide.
pub fn mask_filled_value(
    page: &SnapshotPage,
    value: &str,
    domain: &str,
) -> Result<Option<MaskingSession>, CliError> {
    let mut session = MaskingSession::new(domain)?;
    if !session.is_masked_address(value) {
        debug!(domain, "filled value is not on the masked domain");
        return Ok(None);
    }
    session.hide_inputs(page, Some(value));
    Ok(Some(session))
}

/// Copy of `outcome` with every value passed through the session's mask.
pub fn mask_outcome(outcome: &FillAttemptOutcome, session: &MaskingSession) -> FillAttemptOutcome {
    let mut shown = outcome.clone();
    if let Some(value) = shown.actual_value.as_mut() {
        *value = session.mask_text(value);
    }
    if let Some(candidate) = shown.candidate.as_mut() {
        candidate.current_value = session.mask_text(&candidate.current_value);
    }
    for field in &mut shown.fields {
        field.current_value = session.mask_text(&field.current_value);
    }
    shown
}

pub fn render_fill(outcome: &FillAttemptOutcome, format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Console => Ok(format_fill_report(outcome)),
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(outcome)?)),
    }
}

// ============================================================================
// discover subcommand
// ============================================================================

pub fn cmd_discover(page: &str, no_frames: bool, format: &str) -> Result<(), CliError> {
    let format = OutputFormat::parse(format)?;
    let page = SnapshotPage::load(Path::new(page))?;
    let options = DiscoveryOptions {
        include_nested_frames: !no_frames,
        ..DiscoveryOptions::default()
    };

    let reports: Vec<_> = discover(&page, &options).iter().map(Candidate::report).collect();
    match format {
        OutputFormat::Console => print!("{}", format_candidates(&reports)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
    }
    Ok(())
}

// ============================================================================
// leak subcommand
// ============================================================================

pub fn cmd_leak(website: &str, inbox: &str) -> Result<LeakAssessment, CliError> {
    let messages = load_inbox(Path::new(inbox))?;
    let assessment = assess_inbox(website, &messages);
    print!("{}", format_leak_report(&assessment));
    Ok(assessment)
}

/// Read an inbox dump: a JSON array of messages.
pub fn load_inbox(path: &Path) -> Result<Vec<InboxMessage>, CliError> {
    let shown = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|e| CliError::Read {
        path: shown.clone(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| CliError::InboxParse {
        path: shown,
        source: e,
    })
}

// ============================================================================
// mask subcommand
// ============================================================================

pub fn cmd_mask(input: Option<&str>, domain: &str) -> Result<(), CliError> {
    let text = match input {
        Some(path) => std::fs::read_to_string(path).map_err(|e| CliError::Read {
            path: path.to_string(),
            source: e,
        })?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| CliError::Read {
                    path: "<stdin>".to_string(),
                    source: e,
                })?;
            buf
        }
    };

    let session = MaskingSession::new(domain)?;
    print!("{}", session.mask_text(&text));
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Console,
    Json,
}

impl OutputFormat {
    pub fn parse(name: &str) -> Result<Self, CliError> {
        match name {
            "console" => Ok(Self::Console),
            "json" => Ok(Self::Json),
            other => Err(CliError::UnknownFormat(other.to_string())),
        }
    }
}
