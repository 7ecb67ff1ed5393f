use std::collections::{HashMap, HashSet};

use regex::Regex;
use tracing::debug;

use crate::page::document::PageDocument;
use crate::page::error::PageError;
use crate::page::page_model::NodeId;

pub const DEFAULT_MASKED_DOMAIN: &str = "maildrop.cc";
pub const MASK_PLACEHOLDER: &str = "[Hidden Email]";

/// An input whose real value is kept while it is shown masked.
#[derive(Debug, Clone, PartialEq)]
pub struct HiddenInput {
    pub real_value: String,
    pub email: String,
}

/// Masking state for one page-observation lifecycle.
///
/// Whoever starts observing a page owns the session and passes it to the
/// code that hides, releases and restores addresses. Nothing here is global.
#[derive(Debug)]
pub struct MaskingSession {
    domain: String,
    address: Regex,
    hidden_emails: HashSet<String>,
    hidden_inputs: HashMap<NodeId, HiddenInput>,
}

impl MaskingSession {
    pub fn new(domain: &str) -> Result<Self, PageError> {
        let source = format!(r"[a-zA-Z0-9._%+-]+@{}", regex::escape(domain));
        let address = Regex::new(&source).map_err(|e| PageError::InvalidPattern {
            pattern: source.clone(),
            source: e,
        })?;
        Ok(Self {
            domain: domain.to_lowercase(),
            address,
            hidden_emails: HashSet::new(),
            hidden_inputs: HashMap::new(),
        })
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn is_masked_address(&self, value: &str) -> bool {
        value.to_lowercase().contains(&self.domain)
    }

    /// Register an address so only registered addresses get masked from now on.
    pub fn register(&mut self, email: &str) {
        if self.is_masked_address(email) {
            self.hidden_emails.insert(email.to_string());
        }
    }

    fn should_hide(&self, email: &str) -> bool {
        self.hidden_emails.is_empty() || self.hidden_emails.contains(email)
    }

    /// Replace masked addresses in page text with a placeholder.
    ///
    /// Until an address is registered every address on the domain is hidden.
    pub fn mask_text(&self, text: &str) -> String {
        self.address
            .replace_all(text, |caps: &regex::Captures<'_>| {
                let email = &caps[0];
                if self.should_hide(email) {
                    MASK_PLACEHOLDER.to_string()
                } else {
                    email.to_string()
                }
            })
            .into_owned()
    }

    /// Register `email` (if any) and start tracking every text-like input
    /// that currently holds a masked address. Returns newly hidden nodes.
    pub fn hide_inputs(&mut self, doc: &dyn PageDocument, email: Option<&str>) -> Vec<NodeId> {
        if let Some(email) = email {
            self.register(email);
        }

        let mut newly_hidden = Vec::new();
        for node in doc.input_elements() {
            if self.hidden_inputs.contains_key(&node) {
                continue;
            }
            let Some(el) = doc.describe(node) else {
                continue;
            };
            if !matches!(el.declared_type(), "email" | "text") {
                continue;
            }

            let found = self
                .address
                .find_iter(&el.value)
                .map(|m| m.as_str().to_string())
                .find(|addr| self.should_hide(addr));

            if let Some(addr) = found {
                debug!(node, email = %addr, "hiding input value");
                self.hidden_inputs.insert(
                    node,
                    HiddenInput {
                        real_value: el.value.clone(),
                        email: addr,
                    },
                );
                newly_hidden.push(node);
            }
        }
        newly_hidden
    }

    pub fn is_hidden(&self, node: NodeId) -> bool {
        self.hidden_inputs.contains_key(&node)
    }

    pub fn hidden_count(&self) -> usize {
        self.hidden_inputs.len()
    }

    pub fn hidden_input(&self, node: NodeId) -> Option<&HiddenInput> {
        self.hidden_inputs.get(&node)
    }

    /// Text to render for an input: the placeholder while hidden.
    pub fn display_value(&self, doc: &dyn PageDocument, node: NodeId) -> Option<String> {
        if self.is_hidden(node) {
            return Some(MASK_PLACEHOLDER.to_string());
        }
        doc.value(node).ok()
    }

    /// Field lost focus: keep it hidden while it still holds a masked
    /// address, otherwise release it.
    pub fn on_blur(&mut self, doc: &dyn PageDocument, node: NodeId) {
        let current = doc.value(node).unwrap_or_default();
        if self.is_masked_address(&current) {
            if let Some(hidden) = self.hidden_inputs.get_mut(&node) {
                hidden.real_value = current;
            }
        } else if self.hidden_inputs.remove(&node).is_some() {
            debug!(node, "input released from masking");
        }
    }

    /// Write real values back before a form is submitted. Returns how many
    /// inputs were restored.
    pub fn restore_for_submit(&self, doc: &dyn PageDocument) -> usize {
        let mut restored = 0;
        for (node, hidden) in &self.hidden_inputs {
            match doc.set_value(*node, &hidden.real_value) {
                Ok(()) => restored += 1,
                Err(e) => debug!(node, error = %e, "could not restore hidden input"),
            }
        }
        restored
    }

    /// End the lifecycle: forget registered addresses and tracked inputs.
    pub fn stop(&mut self) {
        self.hidden_emails.clear();
        self.hidden_inputs.clear();
    }
}
