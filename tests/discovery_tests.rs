use field_detection::detect::{
    classifier::is_likely_email_field,
    discovery::{DiscoveryOptions, discover, fingerprint},
    scoring::score,
};
use field_detection::page::{
    page_model::{ElementDescriptor, FrameOrigin},
    snapshot::SnapshotPage,
};

mod common;
use common::utils::{email_input, fixture, hidden, input};

// =========================================================================
// Classification
// =========================================================================

#[test]
fn password_and_phone_fields_are_never_candidates() {
    let cases = [
        (input(Some("password"), "user_email"), "password type"),
        (input(Some("text"), "email_confirm"), "confirmation field"),
        (input(Some("text"), "repeat_email"), "repeat field"),
        (input(Some("tel"), "mobile_login"), "mobile number"),
        (input(Some("text"), "passcode_user"), "pass token"),
    ];
    for (el, label) in cases {
        assert!(!is_likely_email_field(&el), "{label} should be excluded");
    }
}

#[test]
fn account_like_fields_are_candidates() {
    assert!(is_likely_email_field(&input(Some("text"), "username")));
    assert!(is_likely_email_field(&input(None, "signin_id")));

    let aria_only = ElementDescriptor {
        aria_label: Some("Your e-mail or Account".into()),
        ..ElementDescriptor::default()
    };
    assert!(is_likely_email_field(&aria_only));
}

// =========================================================================
// Scoring
// =========================================================================

#[test]
fn email_type_scores_at_least_a_hundred_plus_position() {
    let el = ElementDescriptor {
        input_type: Some("email".into()),
        ..hidden(ElementDescriptor::default())
    };
    assert_eq!(score(&el, None), 100);
    assert_eq!(score(&el, Some(0)), 110);
    assert_eq!(score(&el, Some(2)), 106);
    assert_eq!(score(&el, Some(3)), 100);
}

#[test]
fn autocomplete_email_beats_no_signal() {
    let plain = input(Some("text"), "account");
    let with_hint = ElementDescriptor {
        autocomplete: Some("email".into()),
        ..plain.clone()
    };
    assert!(score(&with_hint, None) > score(&plain, None));
}

// =========================================================================
// Discovery
// =========================================================================

#[test]
fn snapshot_fixture_yields_only_the_email_field() {
    let page = SnapshotPage::load(&fixture("signup.yaml")).unwrap();
    let found = discover(&page, &DiscoveryOptions::default());

    assert_eq!(found.len(), 1, "name, password and phone fields are filtered");
    let c = &found[0];
    assert_eq!(c.node, 1);
    assert_eq!(c.origin, FrameOrigin::Primary);
    assert!(c.visible);
    // 100 type + 50 autocomplete + 40 email + 30 mail + 20 visible + 8 position
    assert_eq!(c.score, 248);
}

#[test]
fn node_matched_by_many_rules_yields_one_candidate() {
    let el = ElementDescriptor {
        autocomplete: Some("email".into()),
        placeholder: Some("Email address".into()),
        class_name: Some("email-input".into()),
        ..email_input("login_email")
    };
    let page = SnapshotPage::new().with_input(el);
    let found = discover(&page, &DiscoveryOptions::default());
    assert_eq!(found.len(), 1);
}

#[test]
fn discovery_is_repeatable_without_mutation() {
    let page = SnapshotPage::new()
        .with_input(input(Some("text"), "username"))
        .with_input(email_input("email"))
        .with_input(hidden(input(None, "login")));

    let first = discover(&page, &DiscoveryOptions::default());
    let second = discover(&page, &DiscoveryOptions::default());

    assert_eq!(first, second);
    assert_eq!(fingerprint(&first), fingerprint(&second));
    let nodes: Vec<_> = first.iter().map(|c| c.node).collect();
    assert_eq!(nodes, vec![0, 1, 2], "document order is kept");
}

#[test]
fn fingerprint_changes_when_a_field_appears() {
    let page = SnapshotPage::new().with_input(email_input("email"));
    let before = fingerprint(&discover(&page, &DiscoveryOptions::default()));
    page.push_input(input(Some("text"), "username"), Default::default());
    let after = fingerprint(&discover(&page, &DiscoveryOptions::default()));
    assert_ne!(before, after);
}

#[test]
fn cross_origin_frames_are_skipped_silently() {
    let same_origin = SnapshotPage::new().with_input(email_input("frame_email"));
    let cross_origin = SnapshotPage::new().with_input(email_input("ad_email"));
    let page = SnapshotPage::new()
        .with_input(input(Some("text"), "username"))
        .with_frame("https://tracker.example.net", false, cross_origin)
        .with_frame("/embedded/signup", true, same_origin);

    let found = discover(&page, &DiscoveryOptions::default());
    assert_eq!(found.len(), 2);

    let framed = &found[1];
    assert_eq!(framed.origin, FrameOrigin::NestedFrame);
    assert_eq!(framed.frame, Some(1));
    assert_eq!(framed.descriptor.name.as_deref(), Some("frame_email"));
    // No position bonus inside frames: 100 + 40 + 30 + 20
    assert_eq!(framed.score, 190);
}

#[test]
fn frames_can_be_excluded() {
    let page = SnapshotPage::new().with_frame(
        "/embedded/signup",
        true,
        SnapshotPage::new().with_input(email_input("email")),
    );
    let options = DiscoveryOptions {
        include_nested_frames: false,
        ..DiscoveryOptions::default()
    };
    assert!(discover(&page, &options).is_empty());
    assert_eq!(discover(&page, &DiscoveryOptions::default()).len(), 1);
}

#[test]
fn invalid_extra_pattern_is_skipped() {
    let tel_account = ElementDescriptor {
        input_type: Some("tel".into()),
        aria_label: Some("Account handle".into()),
        ..ElementDescriptor::default()
    };
    let page = SnapshotPage::new()
        .with_input(email_input("email"))
        .with_input(tel_account);

    let options = DiscoveryOptions {
        extra_patterns: vec!["e(mail".into(), "account".into()],
        ..DiscoveryOptions::default()
    };
    let found = discover(&page, &options);

    let nodes: Vec<_> = found.iter().map(|c| c.node).collect();
    assert_eq!(nodes, vec![0, 1], "valid extra rule still applies");
    assert_eq!(discover(&page, &DiscoveryOptions::default()).len(), 1);
}
