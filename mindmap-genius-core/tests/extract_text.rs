use mindmap_genius_core::contract::{MockFormatExtractor, UploadedFile};
use mindmap_genius_core::extract::{DocumentFormat, ExtractError, TextExtractor};
use mindmap_genius_core::file_policy::{MIME_DOCX, MIME_PDF};
use std::fs::File;
use std::io::Write;
use tempfile::tempdir;

#[tokio::test]
async fn reads_plain_text_from_disk() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("notes.txt");
    {
        let mut f = File::create(&path).unwrap();
        write!(f, "\u{feff}Photosynthesis converts light into chemical energy.").unwrap();
    }

    let file = UploadedFile::from_path(&path, None)
        .await
        .expect("metadata should be readable");
    assert_eq!(file.name, "notes.txt");
    assert!(file.size_bytes > 0);

    let text = TextExtractor::new()
        .extract(&file)
        .await
        .expect("plain text extraction should succeed");
    assert_eq!(text, "Photosynthesis converts light into chemical energy.");
}

#[tokio::test]
async fn other_text_types_are_read_as_text() {
    let file = UploadedFile::from_bytes(
        "page.html",
        Some("text/html".to_string()),
        b"<p>Hello</p>".to_vec(),
    );
    assert_eq!(DocumentFormat::detect(&file), Some(DocumentFormat::OtherText));
    let text = TextExtractor::new().extract(&file).await.unwrap();
    assert_eq!(text, "<p>Hello</p>");
}

#[tokio::test]
async fn io_failure_is_reported_not_swallowed() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("vanishing.txt");
    std::fs::write(&path, "soon gone").unwrap();
    let file = UploadedFile::from_path(&path, Some("text/plain".into()))
        .await
        .unwrap();
    std::fs::remove_file(&path).unwrap();

    let err = TextExtractor::new().extract(&file).await.unwrap_err();
    assert!(matches!(err, ExtractError::Io(_)), "expected Io, got {err:?}");
    assert!(!err.is_not_implemented());
}

#[tokio::test]
async fn invalid_utf8_is_a_failure_not_garbled_text() {
    let file = UploadedFile::from_bytes("bad.txt", None, vec![0x66, 0x6f, 0xff, 0xfe]);
    let err = TextExtractor::new().extract(&file).await.unwrap_err();
    assert!(matches!(err, ExtractError::Encoding(_)), "got {err:?}");
}

/// A 30 KiB PDF with no PDF collaborator registered must fail as "not implemented".
#[tokio::test]
async fn pdf_without_collaborator_is_not_implemented() {
    let file = UploadedFile::from_bytes("paper.pdf", Some(MIME_PDF.into()), vec![0u8; 30 * 1024]);
    let err = TextExtractor::new().extract(&file).await.unwrap_err();
    assert!(err.is_not_implemented(), "got {err:?}");
    assert!(matches!(
        err,
        ExtractError::NotImplemented {
            format: DocumentFormat::Pdf
        }
    ));
    assert_eq!(err.to_string(), "PDF processing not supported yet");
}

#[tokio::test]
async fn docx_by_extension_without_collaborator_is_not_implemented() {
    let file = UploadedFile::from_bytes("report.docx", None, vec![1, 2, 3]);
    let err = TextExtractor::new().extract(&file).await.unwrap_err();
    assert!(matches!(
        err,
        ExtractError::NotImplemented {
            format: DocumentFormat::Docx
        }
    ));
}

#[tokio::test]
async fn unsupported_type_echoes_the_offending_type() {
    let file = UploadedFile::from_bytes("photo.png", Some("image/png".into()), vec![1, 2, 3]);
    let err = TextExtractor::new().extract(&file).await.unwrap_err();
    match &err {
        ExtractError::UnsupportedType { declared } => assert_eq!(declared, "image/png"),
        other => panic!("expected UnsupportedType, got {other:?}"),
    }
    assert!(err.to_string().contains("image/png"));
}

#[tokio::test]
async fn registered_collaborator_handles_its_format() {
    let mut pdf = MockFormatExtractor::new();
    pdf.expect_extract()
        .times(1)
        .returning(|file| Ok(format!("text of {}", file.name)));

    let extractor = TextExtractor::new().register(DocumentFormat::Pdf, pdf);
    assert!(extractor.supports(DocumentFormat::Pdf));
    assert!(!extractor.supports(DocumentFormat::Docx));

    let file = UploadedFile::from_bytes("paper.pdf", Some(MIME_PDF.into()), vec![0u8; 64]);
    let text = extractor.extract(&file).await.unwrap();
    assert_eq!(text, "text of paper.pdf");
}

#[tokio::test]
async fn collaborator_returning_only_whitespace_is_a_failure() {
    let mut docx = MockFormatExtractor::new();
    docx.expect_extract().returning(|_| Ok("   \n ".to_string()));

    let extractor = TextExtractor::new().register(DocumentFormat::Docx, docx);
    let file = UploadedFile::from_bytes("empty.docx", Some(MIME_DOCX.into()), vec![0u8; 64]);
    let err = extractor.extract(&file).await.unwrap_err();
    assert!(
        matches!(
            err,
            ExtractError::Failed {
                format: DocumentFormat::Docx,
                ..
            }
        ),
        "got {err:?}"
    );
}

#[tokio::test]
async fn collaborator_error_is_passed_through() {
    let mut pdf = MockFormatExtractor::new();
    pdf.expect_extract().returning(|_| {
        Err(ExtractError::Failed {
            format: DocumentFormat::Pdf,
            reason: "encrypted document".into(),
        })
    });

    let extractor = TextExtractor::new().register(DocumentFormat::Pdf, pdf);
    let file = UploadedFile::from_bytes("locked.pdf", None, vec![0u8; 64]);
    let err = extractor.extract(&file).await.unwrap_err();
    assert_eq!(err.to_string(), "PDF extraction failed: encrypted document");
}

#[test]
fn detection_follows_dispatch_order() {
    // A .txt name wins even when the mime says PDF: plain text is checked first.
    let file = UploadedFile::from_bytes("odd.txt", Some(MIME_PDF.into()), vec![]);
    assert_eq!(DocumentFormat::detect(&file), Some(DocumentFormat::PlainText));

    let file = UploadedFile::from_bytes("scan", Some(MIME_PDF.into()), vec![]);
    assert_eq!(DocumentFormat::detect(&file), Some(DocumentFormat::Pdf));

    let file = UploadedFile::from_bytes("blob.bin", None, vec![]);
    assert_eq!(DocumentFormat::detect(&file), None);
}
