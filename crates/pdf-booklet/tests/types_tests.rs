use pdf_booklet::*;

#[test]
fn test_paper_size_dimensions() {
    assert_eq!(PaperSize::A4.dimensions_mm(), (210.0, 297.0));
    assert_eq!(PaperSize::A3.dimensions_mm(), (297.0, 420.0));
    assert_eq!(PaperSize::A5.dimensions_mm(), (148.0, 210.0));
    assert_eq!(PaperSize::Letter.dimensions_mm(), (215.9, 279.4));
    assert_eq!(PaperSize::Legal.dimensions_mm(), (215.9, 355.6));
    assert_eq!(PaperSize::Tabloid.dimensions_mm(), (279.4, 431.8));

    let custom = PaperSize::Custom {
        width_mm: 100.0,
        height_mm: 200.0,
    };
    assert_eq!(custom.dimensions_mm(), (100.0, 200.0));
}

#[test]
fn test_auto_paper_falls_back_to_a4() {
    assert_eq!(PaperSize::Auto.dimensions_mm(), PaperSize::A4.dimensions_mm());
}

#[test]
fn test_orientation_swaps_dimensions() {
    assert_eq!(
        PaperSize::A5.dimensions_with_orientation(Orientation::Portrait),
        (148.0, 210.0)
    );
    assert_eq!(
        PaperSize::A5.dimensions_with_orientation(Orientation::Landscape),
        (210.0, 148.0)
    );
}

#[test]
fn test_error_messages() {
    assert_eq!(
        BookletError::IncorrectPassword("secret.pdf".into()).to_string(),
        "Incorrect password for secret.pdf"
    );
    assert_eq!(
        BookletError::MalformedRange("3-x".into()).to_string(),
        "Malformed page range token: '3-x'"
    );

    let chunk = BookletError::Chunk {
        chunk: 2,
        source: Box::new(BookletError::EmptySelection),
    };
    assert_eq!(chunk.to_string(), "Booklet part 2 failed: No pages selected");
    assert!(std::error::Error::source(&chunk).is_some());
}
