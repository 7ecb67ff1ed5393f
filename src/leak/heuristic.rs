use serde::{Deserialize, Serialize};
use url::Url;

/// One received message as it comes out of an inbox dump.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboxMessage {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "headerfrom", alias = "from", default)]
    pub header_from: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
}

/// Result of checking one mailbox against the site it was generated for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeakAssessment {
    pub website: String,
    pub keyword: String,
    pub messages_checked: usize,
    pub non_matching: usize,
    pub possible_leak: bool,
}

/// Lower-cased host of `website`, without the root label's trailing dot.
fn host_of(website: &str) -> String {
    let trimmed = website.trim();
    let host = Url::parse(trimmed)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .unwrap_or_else(|| bare_host(trimmed).to_string());
    host.trim_end_matches('.').to_lowercase()
}

// Bare "example.com/path" or "example.com:8080"
fn bare_host(website: &str) -> &str {
    let host = website.split(['/', '?', '#']).next().unwrap_or("");
    host.rsplit_once(':').map_or(host, |(h, port)| {
        if port.chars().all(|c| c.is_ascii_digit()) { h } else { host }
    })
}

/// Label right before the top-level label: `example` for `mail.example.com`.
/// A single-label host is used whole.
pub fn site_keyword(website: &str) -> String {
    let host = host_of(website);
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() > 1 {
        labels[labels.len() - 2].to_string()
    } else {
        host
    }
}

/// Whether a `From` header mentions the site keyword, ignoring case.
pub fn sender_matches(keyword: &str, header_from: &str) -> bool {
    header_from.to_lowercase().contains(&keyword.to_lowercase())
}

/// Count messages whose sender does not mention the site.
///
/// Messages without a `From` header are not counted.
pub fn assess_inbox(website: &str, messages: &[InboxMessage]) -> LeakAssessment {
    let keyword = site_keyword(website);

    let headers: Vec<&str> = messages
        .iter()
        .filter_map(|m| m.header_from.as_deref())
        .collect();

    let non_matching = headers
        .iter()
        .filter(|from| !sender_matches(&keyword, from))
        .count();

    LeakAssessment {
        website: website.to_string(),
        keyword,
        messages_checked: headers.len(),
        non_matching,
        possible_leak: non_matching > 0,
    }
}
