use sha2::{Digest, Sha256};
use stickerpress::barcode::Code128Renderer;
use stickerpress::export::ExportPipeline;
use stickerpress::fonts;
use stickerpress::model::{LabelBatch, LabelRecord};
use stickerpress::preview::Preview;

fn render_sticker_pdf(quantity: u32) -> Option<Vec<u8>> {
    if !fonts::default_fonts_available() {
        return None;
    }

    let batch = LabelBatch::generate(
        LabelRecord::new("SKU-1001", 1500.0).with_sale_price(1200.0),
        quantity,
    )
    .expect("quantity within range");
    let preview = Preview::render(&batch, &Code128Renderer);
    let bytes = ExportPipeline::default()
        .export(&batch, &preview)
        .expect("render sticker pdf");

    Some(bytes)
}

fn scrub_pdf(bytes: &[u8]) -> Vec<u8> {
    fn scrub_segment(data: &mut [u8], tag: &[u8], terminator: u8) {
        let mut index = 0;
        while index + tag.len() < data.len() {
            if data[index..].starts_with(tag) {
                let mut cursor = index + tag.len();
                while cursor < data.len() {
                    let byte = data[cursor];
                    if byte == terminator {
                        break;
                    }
                    if terminator == b')' {
                        data[cursor] = b'0';
                    } else if !matches!(byte, b'<' | b'>' | b' ' | b'\n' | b'\r' | b'\t') {
                        data[cursor] = b'0';
                    }
                    cursor += 1;
                }
                index = cursor;
            } else {
                index += 1;
            }
        }
    }

    fn scrub_xml(data: &mut [u8], start: &[u8], end: &[u8]) {
        let mut offset = 0;
        while offset + start.len() < data.len() {
            if let Some(start_pos) = data[offset..]
                .windows(start.len())
                .position(|window| window == start)
            {
                let start_index = offset + start_pos + start.len();
                if let Some(end_pos) = data[start_index..]
                    .windows(end.len())
                    .position(|window| window == end)
                {
                    for byte in &mut data[start_index..start_index + end_pos] {
                        if !matches!(*byte, b'<' | b'>' | b'/' | b' ' | b'\n' | b'\r' | b'\t') {
                            *byte = b'0';
                        }
                    }
                    offset = start_index + end_pos + end.len();
                } else {
                    break;
                }
            } else {
                break;
            }
        }
    }

    let mut normalized = bytes.to_vec();
    scrub_segment(&mut normalized, b"/CreationDate(", b')');
    scrub_segment(&mut normalized, b"/ModDate(", b')');
    scrub_segment(&mut normalized, b"/ID[", b']');
    scrub_segment(&mut normalized, b"/Producer(", b')');
    scrub_xml(&mut normalized, b"<xmp:CreateDate>", b"</xmp:CreateDate>");
    scrub_xml(&mut normalized, b"<xmp:ModifyDate>", b"</xmp:ModifyDate>");
    scrub_xml(
        &mut normalized,
        b"<xmp:MetadataDate>",
        b"</xmp:MetadataDate>",
    );
    scrub_xml(
        &mut normalized,
        b"<xmpMM:DocumentID>",
        b"</xmpMM:DocumentID>",
    );
    scrub_xml(&mut normalized, b"<xmpMM:InstanceID>", b"</xmpMM:InstanceID>");
    scrub_xml(&mut normalized, b"<xmpMM:VersionID>", b"</xmpMM:VersionID>");
    normalized
}

fn normalized_hash(bytes: &[u8]) -> [u8; 32] {
    let normalized = scrub_pdf(bytes);
    let digest = Sha256::digest(&normalized);
    digest.into()
}

fn media_boxes(bytes: &[u8]) -> Vec<(f64, f64)> {
    let needle = b"/MediaBox";
    let mut boxes = Vec::new();
    let mut offset = 0;
    while let Some(found) = bytes[offset..]
        .windows(needle.len())
        .position(|window| window == needle)
    {
        let start = offset + found + needle.len();
        let open = start
            + bytes[start..]
                .iter()
                .position(|&byte| byte == b'[')
                .expect("media box opening bracket");
        let close = open
            + bytes[open..]
                .iter()
                .position(|&byte| byte == b']')
                .expect("media box closing bracket");
        let coordinates: Vec<f64> = String::from_utf8_lossy(&bytes[open + 1..close])
            .split_whitespace()
            .filter_map(|token| token.parse().ok())
            .collect();
        assert_eq!(
            coordinates.len(),
            4,
            "media box should carry four coordinates"
        );
        boxes.push((
            coordinates[2] - coordinates[0],
            coordinates[3] - coordinates[1],
        ));
        offset = close;
    }
    boxes
}

fn page_count(bytes: &[u8]) -> usize {
    let needle = b"/Type /Page";
    bytes
        .windows(needle.len() + 1)
        .filter(|window| window.starts_with(needle) && window[needle.len()] != b's')
        .count()
}

fn skip_message(test: &str) -> String {
    format!(
        "Skipping {test}: bundled fonts missing. Set STICKERPRESS_FONTS_DIR or copy assets/fonts next to the binary."
    )
}

#[test]
fn renders_non_empty_output() {
    let Some(bytes) = render_sticker_pdf(3) else {
        eprintln!("{}", skip_message("renders_non_empty_output"));
        return;
    };
    assert!(
        !bytes.is_empty(),
        "rendered PDF should contain at least a header"
    );
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn renders_one_page_per_sticker() {
    let Some(bytes) = render_sticker_pdf(5) else {
        eprintln!("{}", skip_message("renders_one_page_per_sticker"));
        return;
    };
    assert_eq!(page_count(&bytes), 5);
}

#[test]
fn pages_are_label_sized() {
    let Some(bytes) = render_sticker_pdf(3) else {
        eprintln!("{}", skip_message("pages_are_label_sized"));
        return;
    };

    const POINTS_PER_MM: f64 = 72.0 / 25.4;
    let expected_width = 38.0 * POINTS_PER_MM;
    let expected_height = 25.0 * POINTS_PER_MM;

    let boxes = media_boxes(&bytes);
    assert!(!boxes.is_empty(), "rendered PDF should declare a media box");
    for (width, height) in boxes {
        assert!(
            (width - expected_width).abs() < 0.5,
            "page width {width}pt should be 38mm ({expected_width}pt)"
        );
        assert!(
            (height - expected_height).abs() < 0.5,
            "page height {height}pt should be 25mm ({expected_height}pt)"
        );
    }
}

#[test]
fn rendering_is_deterministic() {
    let Some(bytes_a) = render_sticker_pdf(2) else {
        eprintln!("{}", skip_message("rendering_is_deterministic"));
        return;
    };
    let Some(bytes_b) = render_sticker_pdf(2) else {
        eprintln!("{}", skip_message("rendering_is_deterministic"));
        return;
    };

    assert_eq!(bytes_a.len(), bytes_b.len(), "PDF sizes should match");

    let hash_a = normalized_hash(&bytes_a);
    let hash_b = normalized_hash(&bytes_b);

    assert_eq!(
        hash_a, hash_b,
        "PDF renders must be deterministic after metadata normalization"
    );
}
