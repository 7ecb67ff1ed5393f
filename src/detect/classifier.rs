use crate::page::page_model::ElementDescriptor;

/// Tokens that suggest a field takes an email or account identifier.
const STRONG_INDICATORS: [&str; 8] = [
    "email", "mail", "@", "user", "login", "account", "signin", "signup",
];

/// Tokens that rule a field out (credentials, phone numbers, confirmations).
const EXCLUDE_INDICATORS: [&str; 7] = [
    "password", "pass", "pwd", "confirm", "repeat", "phone", "mobile",
];

/// Lower-cased concatenation of every attribute the classifier reads.
pub fn attribute_text(el: &ElementDescriptor) -> String {
    [
        &el.name,
        &el.id,
        &el.placeholder,
        &el.class_name,
        &el.test_id,
        &el.data_cy,
        &el.aria_label,
        &el.autocomplete,
    ]
    .iter()
    .map(|v| v.as_deref().unwrap_or(""))
    .collect::<Vec<_>>()
    .join(" ")
    .to_lowercase()
}

/// Narrower text used by the scorer: name, id, placeholder and class only.
pub fn scoring_text(el: &ElementDescriptor) -> String {
    [&el.name, &el.id, &el.placeholder, &el.class_name]
        .iter()
        .map(|v| v.as_deref().unwrap_or(""))
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

pub fn is_password(el: &ElementDescriptor) -> bool {
    el.declared_type().eq_ignore_ascii_case("password")
}

/// Whether a discovered input plausibly accepts an email address.
pub fn is_likely_email_field(el: &ElementDescriptor) -> bool {
    if is_password(el) {
        return false;
    }

    let text = attribute_text(el);
    let has_strong = STRONG_INDICATORS.iter().any(|t| text.contains(t));
    let has_exclude = EXCLUDE_INDICATORS.iter().any(|t| text.contains(t));

    has_strong && !has_exclude
}
