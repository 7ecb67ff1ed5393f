use std::collections::HashSet;

use tracing::{debug, trace};

use crate::detect::candidate::Candidate;
use crate::detect::classifier::is_likely_email_field;
use crate::detect::rules::{DiscoveryRule, builtin_rules};
use crate::detect::scoring::score;
use crate::page::document::PageDocument;
use crate::page::page_model::FrameOrigin;

/// Knobs for one discovery pass.
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    pub include_nested_frames: bool,
    /// Extra case-insensitive regexes matched against the attribute text.
    pub extra_patterns: Vec<String>,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            include_nested_frames: true,
            extra_patterns: Vec::new(),
        }
    }
}

impl DiscoveryOptions {
    /// Built-in rules followed by the configured extra patterns.
    pub fn rules(&self) -> Vec<DiscoveryRule> {
        let mut rules = builtin_rules();
        rules.extend(self.extra_patterns.iter().map(|p| DiscoveryRule::regex(p)));
        rules
    }
}

/// Find every email-like input in `doc` and, optionally, its readable frames.
///
/// Candidates come back de-duplicated and in document order: the primary
/// document first, then each nested frame in frame order.
pub fn discover(doc: &dyn PageDocument, options: &DiscoveryOptions) -> Vec<Candidate> {
    let rules = options.rules();
    let mut candidates = scan_document(doc, None, &rules);

    if options.include_nested_frames {
        for index in 0..doc.frame_count() {
            match doc.frame_document(index) {
                Some(frame_doc) => {
                    candidates.extend(scan_document(frame_doc, Some(index), &rules));
                }
                None => {
                    trace!(frame = index, "nested frame not readable, skipped");
                }
            }
        }
    }

    candidates
}

fn scan_document(
    doc: &dyn PageDocument,
    frame: Option<usize>,
    rules: &[DiscoveryRule],
) -> Vec<Candidate> {
    let mut hits = HashSet::new();
    for rule in rules {
        match doc.query(rule) {
            Ok(nodes) => hits.extend(nodes),
            Err(e) => debug!(rule = %rule, error = %e, "discovery rule failed, skipping"),
        }
    }

    let origin = match frame {
        None => FrameOrigin::Primary,
        Some(_) => FrameOrigin::NestedFrame,
    };

    doc.input_elements()
        .into_iter()
        .enumerate()
        .filter(|(_, node)| hits.contains(node))
        .filter_map(|(position, node)| {
            let descriptor = doc.describe(node)?;
            if !is_likely_email_field(&descriptor) {
                return None;
            }
            // Position bonus only applies to the primary document's inputs.
            let position = frame.is_none().then_some(position);
            Some(Candidate {
                frame,
                node,
                score: score(&descriptor, position),
                visible: descriptor.is_visible(),
                descriptor,
                origin,
            })
        })
        .collect()
}

/// Stable identity of a candidate set, used to spot page changes between polls.
pub fn fingerprint(candidates: &[Candidate]) -> String {
    use sha1::{Digest, Sha1};

    let mut hasher = Sha1::new();
    for c in candidates {
        let frame = c.frame.map_or(-1, |f| f as i64);
        hasher.update(format!("{}:{}:{}:{};", frame, c.node, c.score, c.visible).as_bytes());
    }
    format!("{:x}", hasher.finalize())
}
