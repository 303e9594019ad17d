use mindmap_genius_core::content_policy::{ContentRejection, ContentValidator};

#[test]
fn blank_text_is_required() {
    let validator = ContentValidator::default();
    for text in ["", "   ", "\n\t  \n"] {
        assert_eq!(validator.validate(text), Err(ContentRejection::Blank));
    }
    assert_eq!(ContentRejection::Blank.to_string(), "text required");
}

#[test]
fn forty_characters_is_too_short() {
    let text = "a".repeat(40);
    let err = ContentValidator::default().validate(&text).unwrap_err();
    assert_eq!(err, ContentRejection::TooShort { chars: 40, min: 50 });
    assert!(
        err.to_string().starts_with("too short"),
        "unexpected message: {err}"
    );
}

#[test]
fn bounds_are_inclusive() {
    let validator = ContentValidator::default();
    assert!(validator.validate(&"x".repeat(50)).is_ok());
    assert!(validator.validate(&"x".repeat(50_000)).is_ok());
    assert!(validator.validate(&"x".repeat(49)).is_err());

    let err = validator.validate(&"x".repeat(50_001)).unwrap_err();
    assert_eq!(
        err,
        ContentRejection::TooLong {
            chars: 50_001,
            max: 50_000
        }
    );
    assert!(err.to_string().starts_with("too long, trim input"));
}

#[test]
fn length_counts_characters_not_bytes() {
    // 50 multi-byte characters: 150 bytes but exactly at the lower bound.
    let text = "é".repeat(25) + &"語".repeat(25);
    assert_eq!(text.chars().count(), 50);
    assert!(ContentValidator::default().validate(&text).is_ok());
}

#[test]
fn custom_bounds_are_enforced_at_both_ends() {
    let validator = ContentValidator::new(5, 10);
    assert_eq!(validator.bounds(), (5, 10));
    assert!(validator.validate("hello").is_ok());
    assert!(matches!(
        validator.validate("hey"),
        Err(ContentRejection::TooShort { .. })
    ));
    assert!(matches!(
        validator.validate("hello world!"),
        Err(ContentRejection::TooLong { .. })
    ));
}
