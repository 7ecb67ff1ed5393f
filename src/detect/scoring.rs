use crate::detect::classifier::scoring_text;
use crate::page::page_model::ElementDescriptor;

/// Additive suitability score. Higher is a better target.
///
/// `position` is the element's index among the primary document's inputs;
/// `None` for elements outside it (nested frames).
pub fn score(el: &ElementDescriptor, position: Option<usize>) -> i32 {
    let mut score = 0;

    // Type scoring
    if el.input_type.as_deref() == Some("email") {
        score += 100;
    }
    match el.autocomplete.as_deref() {
        Some("email") => score += 50,
        Some("username") => score += 30,
        _ => {}
    }

    // Attribute scoring
    let text = scoring_text(el);
    if text.contains("email") {
        score += 40;
    }
    if text.contains("mail") {
        score += 30;
    }
    if text.contains("user") {
        score += 20;
    }
    if text.contains("login") {
        score += 15;
    }

    if el.is_visible() {
        score += 20;
    }

    // First fields on a page are usually the important ones
    if let Some(p) = position.filter(|p| *p < 3) {
        score += 10 - 2 * p as i32;
    }

    score
}
