use field_detection::masking::session::{DEFAULT_MASKED_DOMAIN, MASK_PLACEHOLDER, MaskingSession};
use field_detection::page::{
    document::PageDocument,
    page_model::ElementDescriptor,
    snapshot::SnapshotPage,
};

mod common;
use common::utils::{email_input, input};

fn with_value(el: ElementDescriptor, value: &str) -> ElementDescriptor {
    ElementDescriptor {
        value: value.to_string(),
        ..el
    }
}

#[test]
fn only_registered_addresses_are_hidden_once_registered() {
    let page = SnapshotPage::new()
        .with_input(with_value(email_input("email"), "mine@maildrop.cc"))
        .with_input(with_value(input(Some("text"), "referrer"), "friend@maildrop.cc"));

    let mut session = MaskingSession::new(DEFAULT_MASKED_DOMAIN).unwrap();
    let hidden = session.hide_inputs(&page, Some("mine@maildrop.cc"));

    assert_eq!(hidden, vec![0]);
    assert!(!session.is_hidden(1));
    assert_eq!(
        session.mask_text("from mine@maildrop.cc to friend@maildrop.cc"),
        format!("from {} to friend@maildrop.cc", MASK_PLACEHOLDER)
    );
}

#[test]
fn non_text_inputs_are_left_alone() {
    let page = SnapshotPage::new()
        .with_input(with_value(input(Some("hidden"), "token"), "x@maildrop.cc"))
        .with_input(with_value(input(None, "contact"), "x@maildrop.cc"));

    let mut session = MaskingSession::new(DEFAULT_MASKED_DOMAIN).unwrap();
    assert_eq!(session.hide_inputs(&page, None), vec![1], "untyped reads as text");
}

#[test]
fn real_values_are_restored_for_submit() {
    let page = SnapshotPage::new()
        .with_input(with_value(email_input("email"), "mine@maildrop.cc"));

    let mut session = MaskingSession::new(DEFAULT_MASKED_DOMAIN).unwrap();
    session.hide_inputs(&page, Some("mine@maildrop.cc"));
    assert_eq!(session.display_value(&page, 0).as_deref(), Some(MASK_PLACEHOLDER));

    // The page overwrote the field with the placeholder text it displayed.
    page.set_value(0, MASK_PLACEHOLDER).unwrap();
    assert_eq!(session.restore_for_submit(&page), 1);
    assert_eq!(page.value(0).unwrap(), "mine@maildrop.cc");
}

#[test]
fn blur_releases_fields_that_no_longer_hold_the_address() {
    let page = SnapshotPage::new()
        .with_input(with_value(email_input("email"), "mine@maildrop.cc"));
    let mut session = MaskingSession::new(DEFAULT_MASKED_DOMAIN).unwrap();
    session.hide_inputs(&page, Some("mine@maildrop.cc"));

    page.set_value(0, "other@maildrop.cc").unwrap();
    session.on_blur(&page, 0);
    assert!(session.is_hidden(0));
    assert_eq!(session.hidden_input(0).unwrap().real_value, "other@maildrop.cc");

    page.set_value(0, "me@example.com").unwrap();
    session.on_blur(&page, 0);
    assert!(!session.is_hidden(0));
}

#[test]
fn stop_forgets_everything() {
    let page = SnapshotPage::new()
        .with_input(with_value(email_input("email"), "mine@maildrop.cc"));
    let mut session = MaskingSession::new(DEFAULT_MASKED_DOMAIN).unwrap();
    session.hide_inputs(&page, Some("mine@maildrop.cc"));

    session.stop();
    assert!(!session.is_hidden(0));
    assert_eq!(session.restore_for_submit(&page), 0);
    assert_eq!(session.mask_text("any@maildrop.cc"), MASK_PLACEHOLDER);
}

#[test]
fn custom_domain_is_escaped() {
    let session = MaskingSession::new("mail.tm").unwrap();
    assert_eq!(session.mask_text("a@mail.tm"), MASK_PLACEHOLDER);
    assert_eq!(session.mask_text("a@mailxtm"), "a@mailxtm");
    assert_eq!(session.domain(), "mail.tm");
}
