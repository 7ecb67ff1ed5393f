use crate::detect::candidate::CandidateReport;
use crate::fill::outcome::FillAttemptOutcome;
use crate::leak::heuristic::LeakAssessment;
use crate::page::page_model::FrameOrigin;

// ============================================================================
// Console reporter: formatted terminal output
// ============================================================================

/// Format a fill outcome for terminal output.
///
/// Produces output like:
/// ```text
/// ✓ FILLED  input#email (primary document, 1 round, 150 ms)
///     value: someone@maildrop.cc
///
/// Candidates (2):
///     1. INPUT type=email name=email id=email score=135 visible
///     2. INPUT type=text name=username id=- score=25 hidden
/// ```
pub fn format_fill_report(outcome: &FillAttemptOutcome) -> String {
    let mut out = String::new();
    let rounds = if outcome.rounds == 1 { "round" } else { "rounds" };

    match &outcome.selector {
        Some(selector) if outcome.success => {
            let origin = outcome.origin.map_or("unknown origin", origin_label);
            out.push_str(&format!(
                "\u{2713} FILLED  {} ({}, {} {}, {} ms)\n",
                selector, origin, outcome.rounds, rounds, outcome.elapsed_ms
            ));
            if let Some(ref value) = outcome.actual_value {
                out.push_str(&format!("    value: {}\n", value));
            }
        }
        _ => {
            out.push_str(&format!(
                "\u{2717} FAILED  {} ({} {}, {} ms)\n",
                outcome.reason.as_deref().unwrap_or("unknown failure"),
                outcome.rounds,
                rounds,
                outcome.elapsed_ms
            ));
        }
    }

    if !outcome.fields.is_empty() {
        out.push('\n');
        out.push_str(&format_candidates(&outcome.fields));
    }
    out
}

/// Numbered candidate table, in the order given.
pub fn format_candidates(candidates: &[CandidateReport]) -> String {
    let mut out = format!("Candidates ({}):\n", candidates.len());
    for (i, c) in candidates.iter().enumerate() {
        out.push_str(&format!(
            "    {}. {} type={} name={} id={} score={} {}",
            i + 1,
            c.tag,
            c.input_type,
            c.name.as_deref().unwrap_or("-"),
            c.id.as_deref().unwrap_or("-"),
            c.score,
            if c.visible { "visible" } else { "hidden" },
        ));
        if c.origin == FrameOrigin::NestedFrame {
            out.push_str(" [frame]");
        }
        if !c.current_value.is_empty() {
            out.push_str(&format!(" value={:?}", c.current_value));
        }
        out.push('\n');
    }
    out
}

pub fn format_leak_report(assessment: &LeakAssessment) -> String {
    let marker = if assessment.possible_leak {
        "\u{2717} POSSIBLE LEAK"
    } else {
        "\u{2713} OK"
    };
    format!(
        "{}  {} (keyword \"{}\": {} of {} senders unrelated)\n",
        marker,
        assessment.website,
        assessment.keyword,
        assessment.non_matching,
        assessment.messages_checked
    )
}

fn origin_label(origin: FrameOrigin) -> &'static str {
    match origin {
        FrameOrigin::Primary => "primary document",
        FrameOrigin::NestedFrame => "nested frame",
    }
}
