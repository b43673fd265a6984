//! Fixtures for tests in this workspace. Enabled with the `test-util` feature.

use std::fmt::Write as _;

/// Build a minimal uncompressed PDF with one page per entry of `pages`,
/// each showing its text in Helvetica. Cross-reference offsets are computed
/// from the generated bytes, so real parsers accept the file as-is.
///
/// Page text must not contain `(`, `)` or `\`.
pub fn minimal_pdf(pages: &[&str]) -> Vec<u8> {
    // 1: catalog, 2: page tree, 3: font, then (page, content) pairs
    let page_id = |i: usize| 4 + 2 * i;
    let content_id = |i: usize| 5 + 2 * i;

    let kids = (0..pages.len())
        .map(|i| format!("{} 0 R", page_id(i)))
        .collect::<Vec<_>>()
        .join(" ");

    let mut objects = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!("<< /Type /Pages /Kids [{kids}] /Count {} >>", pages.len()),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
    ];
    for (i, text) in pages.iter().enumerate() {
        let stream = format!("BT /F1 24 Tf 72 700 Td ({text}) Tj ET");
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            content_id(i)
        ));
        objects.push(format!(
            "<< /Length {} >>\nstream\n{stream}\nendstream",
            stream.len()
        ));
    }

    let mut out = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        let _ = write!(out, "{} 0 obj\n{body}\nendobj\n", i + 1);
    }

    let xref_at = out.len();
    let _ = write!(out, "xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        let _ = write!(out, "{offset:010} 00000 n \n");
    }
    let _ = write!(
        out,
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
        objects.len() + 1
    );
    out.into_bytes()
}

/// Split rendered output into `(page number, trimmed body)` pairs, in file order.
pub fn split_rendered(output: &str) -> Vec<(usize, String)> {
    let mut pages: Vec<(usize, String)> = Vec::new();
    for line in output.lines() {
        let number = line
            .strip_prefix("--- Page ")
            .and_then(|rest| rest.strip_suffix(" ---"))
            .and_then(|n| n.parse().ok());
        match (number, pages.last_mut()) {
            (Some(n), _) => pages.push((n, String::new())),
            (None, Some((_, body))) => {
                body.push_str(line);
                body.push('\n');
            }
            (None, None) => {}
        }
    }
    for (_, body) in &mut pages {
        *body = body.trim().to_string();
    }
    pages
}
