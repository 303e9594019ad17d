use mindmap_genius_core::contract::UploadedFile;
use mindmap_genius_core::file_policy::{FileRejection, FileValidator, MIME_DOCX, MIME_PDF};

fn declared(name: &str, mime: Option<&str>, size_bytes: u64) -> UploadedFile {
    let mut file = UploadedFile::from_bytes(name, mime.map(str::to_string), Vec::new());
    file.size_bytes = size_bytes;
    file
}

const MIB: u64 = 1024 * 1024;

#[test]
fn accepts_each_allowed_type_by_mime() {
    let validator = FileValidator::default();
    for (name, mime) in [
        ("notes.txt", "text/plain"),
        ("paper.pdf", MIME_PDF),
        ("report.docx", MIME_DOCX),
    ] {
        assert_eq!(
            validator.validate(&declared(name, Some(mime), 2048)),
            Ok(()),
            "{name} ({mime}) should be accepted"
        );
    }
}

#[test]
fn accepts_exactly_ten_mib_and_rejects_one_byte_more() {
    let validator = FileValidator::default();
    assert!(validator
        .validate(&declared("big.pdf", Some(MIME_PDF), 10 * MIB))
        .is_ok());

    let err = validator
        .validate(&declared("big.pdf", Some(MIME_PDF), 10 * MIB + 1))
        .unwrap_err();
    assert_eq!(
        err,
        FileRejection::TooLarge {
            size_bytes: 10 * MIB + 1,
            limit_bytes: 10 * MIB
        }
    );
    assert!(err.to_string().starts_with("file too large"));
}

#[test]
fn size_is_checked_before_type() {
    let validator = FileValidator::default();
    let err = validator
        .validate(&declared("photo.png", Some("image/png"), 20 * MIB))
        .unwrap_err();
    assert!(
        matches!(err, FileRejection::TooLarge { .. }),
        "oversized file of a bad type must report size first, got {err:?}"
    );
}

#[test]
fn extension_is_used_when_mime_is_absent_or_generic() {
    let validator = FileValidator::default();
    assert!(validator.validate(&declared("Notes.TXT", None, 10)).is_ok());
    assert!(validator.validate(&declared("paper.pdf", Some(""), 10)).is_ok());
    assert!(validator
        .validate(&declared("report.docx", Some("application/octet-stream"), 10))
        .is_ok());
}

#[test]
fn extension_does_not_override_a_specific_disallowed_mime() {
    let validator = FileValidator::default();
    let err = validator
        .validate(&declared("sneaky.txt", Some("image/png"), 10))
        .unwrap_err();
    assert_eq!(
        err,
        FileRejection::UnsupportedType {
            declared: "image/png".to_string()
        }
    );
    assert!(err.to_string().starts_with("unsupported type"));
}

#[test]
fn mime_parameters_and_case_are_ignored() {
    let validator = FileValidator::default();
    assert!(validator
        .validate(&declared("notes", Some("Text/Plain; charset=utf-8"), 10))
        .is_ok());
}

#[test]
fn rejects_unknown_types_with_or_without_extension() {
    let validator = FileValidator::default();
    for (name, mime) in [
        ("slides.pptx", None),
        ("archive", Some("application/octet-stream")),
        ("README.md", Some("text/markdown")),
        ("noextension", None),
    ] {
        let result = validator.validate(&declared(name, mime, 10));
        assert!(
            matches!(result, Err(FileRejection::UnsupportedType { .. })),
            "{name} ({mime:?}) should be rejected, got {result:?}"
        );
    }
}

#[test]
fn custom_limit_is_honoured() {
    let validator = FileValidator::new(1024);
    assert!(validator.validate(&declared("a.txt", None, 1024)).is_ok());
    assert!(validator.validate(&declared("a.txt", None, 1025)).is_err());
}

/// Thirty KiB of PDF is well inside policy.
#[test]
fn thirty_kib_pdf_is_accepted() {
    let file = UploadedFile::from_bytes("paper.pdf", Some(MIME_PDF.to_string()), vec![0u8; 30 * 1024]);
    assert_eq!(file.size_bytes, 30 * 1024);
    assert!(FileValidator::default().validate(&file).is_ok());
}
