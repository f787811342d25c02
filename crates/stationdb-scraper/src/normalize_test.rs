use super::*;

// -----------------------------------------------------------------------
// normalize_phone
// -----------------------------------------------------------------------

#[test]
fn normalize_phone_hyphenated() {
    assert_eq!(
        normalize_phone("205-583-4300").as_deref(),
        Some("(205) 583-4300")
    );
}

#[test]
fn normalize_phone_structural_variants_collapse() {
    let variants = [
        "205-583-4300",
        "205.583.4300",
        "205 583 4300",
        "(205) 583-4300",
        "(205)583-4300",
        "2055834300",
        "+1 205 583 4300",
        "1-205-583-4300",
    ];
    for raw in variants {
        assert_eq!(
            normalize_phone(raw).as_deref(),
            Some("(205) 583-4300"),
            "variant {raw:?}"
        );
    }
}

#[test]
fn normalize_phone_keeps_extension() {
    assert_eq!(
        normalize_phone("205-583-4300 ext. 12").as_deref(),
        Some("(205) 583-4300 ext. 12")
    );
    assert_eq!(
        normalize_phone("(205) 583-4300 x204").as_deref(),
        Some("(205) 583-4300 ext. 204")
    );
    assert_eq!(
        normalize_phone("205.583.4300 Extension 7").as_deref(),
        Some("(205) 583-4300 ext. 7")
    );
}

#[test]
fn normalize_phone_is_idempotent() {
    for raw in ["205-583-4300", "1 (251) 662-1010 ext 3", "7174561234"] {
        let once = normalize_phone(raw).unwrap();
        assert_eq!(normalize_phone(&once).as_deref(), Some(once.as_str()));
    }
}

#[test]
fn normalize_phone_rejects_wrong_digit_counts() {
    assert!(normalize_phone("583-4300").is_none());
    assert!(normalize_phone("205-583-43001").is_none());
    assert!(normalize_phone("44 20 7946 0958 12").is_none());
    assert!(normalize_phone("").is_none());
}

#[test]
fn normalize_phone_rejects_eleven_digits_without_country_code() {
    assert!(normalize_phone("22055834300").is_none());
}

// -----------------------------------------------------------------------
// normalize_email
// -----------------------------------------------------------------------

#[test]
fn normalize_email_lower_cases() {
    assert_eq!(
        normalize_email("News@WBRC.com").as_deref(),
        Some("news@wbrc.com")
    );
}

#[test]
fn normalize_email_drops_placeholders_case_insensitively() {
    for raw in [
        "example@station.com",
        "Test@station.com",
        "NOREPLY@station.com",
        "no-reply@station.com",
        "donotreply@station.com",
        "placeholder@station.com",
        "sample@station.com",
        "user.example@station.com",
    ] {
        assert!(normalize_email(raw).is_none(), "{raw} should be dropped");
    }
}

#[test]
fn normalize_email_keeps_addresses_that_only_contain_a_placeholder_word() {
    assert_eq!(
        normalize_email("testimonials.desk@station.com").as_deref(),
        Some("testimonials.desk@station.com")
    );
}

#[test]
fn normalize_email_drops_asset_names() {
    assert!(normalize_email("logo@2x.png").is_none());
    assert!(normalize_email("hero@3x.webp").is_none());
}

#[test]
fn normalize_email_rejects_missing_parts() {
    assert!(normalize_email("@station.com").is_none());
    assert!(normalize_email("newsroom").is_none());
}
