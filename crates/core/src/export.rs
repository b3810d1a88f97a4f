//! Export shaping for payment reports
//!
//! Deterministic serialization of an aggregated payment-details list into
//! CSV and PDF bytes. Column order is fixed; identical input always
//! produces identical output.

use crate::reports::PaymentDetail;

const CSV_HEADER: [&str; 12] = [
    "Room Number",
    "Room Type",
    "Guest Name",
    "Guest Phone",
    "Guest Email",
    "Payment Month",
    "Amount",
    "Payment Method",
    "Payment Date",
    "Payment Status",
    "Balance Amount",
    "Notes",
];

/// Serialize payment details as CSV with RFC-4180-style quoting
pub fn payments_csv(rows: &[PaymentDetail]) -> String {
    let mut out = String::new();
    write_csv_row(&mut out, CSV_HEADER.iter().map(|s| s.to_string()));

    for row in rows {
        write_csv_row(
            &mut out,
            [
                row.room_number.clone(),
                row.room_type.clone(),
                row.guest_name.clone(),
                row.guest_phone.clone(),
                row.guest_email.clone(),
                row.payment_month.clone(),
                row.payment_amount.to_string(),
                row.payment_method.clone(),
                row.payment_date
                    .map(|d| d.to_rfc3339())
                    .unwrap_or_default(),
                row.payment_status.to_string(),
                row.balance_amount.to_string(),
                row.notes.clone().unwrap_or_default(),
            ]
            .into_iter(),
        );
    }
    out
}

fn write_csv_row(out: &mut String, fields: impl Iterator<Item = String>) {
    let mut first = true;
    for field in fields {
        if !first {
            out.push(',');
        }
        first = false;
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            out.push('"');
            out.push_str(&field.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(&field);
        }
    }
    out.push_str("\r\n");
}

// PDF layout constants (US letter, points)
const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN_LEFT: f32 = 40.0;
const ROW_HEIGHT: f32 = 14.0;
const FIRST_PAGE_TOP: f32 = 720.0;
const PAGE_TOP: f32 = 752.0;
const PAGE_BOTTOM: f32 = 40.0;

/// (header, x offset, max chars) per table column
const PDF_COLUMNS: [(&str, f32, usize); 7] = [
    ("Room", 40.0, 10),
    ("Guest", 100.0, 20),
    ("Email", 210.0, 26),
    ("Month", 350.0, 10),
    ("Amount", 420.0, 10),
    ("Status", 480.0, 9),
    ("Balance", 540.0, 10),
];

/// Serialize payment details as a single-font tabular PDF document
pub fn payments_pdf(rows: &[PaymentDetail], title: &str) -> Vec<u8> {
    let pages = paginate(rows);
    let mut streams = Vec::with_capacity(pages.len());
    for (index, page_rows) in pages.iter().enumerate() {
        streams.push(page_content(title, index == 0, page_rows));
    }
    assemble(&streams)
}

fn paginate<'a>(rows: &'a [PaymentDetail]) -> Vec<&'a [PaymentDetail]> {
    let first_capacity = ((FIRST_PAGE_TOP - PAGE_BOTTOM) / ROW_HEIGHT) as usize;
    let later_capacity = ((PAGE_TOP - PAGE_BOTTOM) / ROW_HEIGHT) as usize;

    let mut pages = Vec::new();
    let mut rest = rows;
    let mut capacity = first_capacity;
    loop {
        let take = rest.len().min(capacity);
        pages.push(&rest[..take]);
        rest = &rest[take..];
        if rest.is_empty() {
            break;
        }
        capacity = later_capacity;
    }
    pages
}

fn page_content(title: &str, is_first: bool, rows: &[PaymentDetail]) -> Vec<u8> {
    let mut ops = String::new();
    let mut y = if is_first {
        ops.push_str("BT /F1 16 Tf 1 0 0 1 40 756 Tm (");
        ops.push_str(&pdf_escape(title));
        ops.push_str(") Tj ET\n");
        FIRST_PAGE_TOP
    } else {
        PAGE_TOP
    };

    // Column header row
    for (header, x, _) in PDF_COLUMNS {
        text_op(&mut ops, x, y, 10.0, header);
    }
    y -= ROW_HEIGHT;

    for row in rows {
        let cells = [
            row.room_number.clone(),
            row.guest_name.clone(),
            row.guest_email.clone(),
            row.payment_month.clone(),
            row.payment_amount.to_string(),
            row.payment_status.to_string(),
            row.balance_amount.to_string(),
        ];
        for ((_, x, max_chars), cell) in PDF_COLUMNS.iter().zip(cells) {
            let clipped: String = cell.chars().take(*max_chars).collect();
            text_op(&mut ops, *x, y, 9.0, &clipped);
        }
        y -= ROW_HEIGHT;
    }

    ops.into_bytes()
}

fn text_op(ops: &mut String, x: f32, y: f32, size: f32, text: &str) {
    ops.push_str(&format!(
        "BT /F1 {size} Tf 1 0 0 1 {x} {y} Tm ({}) Tj ET\n",
        pdf_escape(text)
    ));
}

/// Escape PDF string delimiters; non-ASCII falls back to '?' since the
/// built-in Helvetica encoding cannot represent it
fn pdf_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            '\\' => out.push_str("\\\\"),
            c if c.is_ascii_graphic() || c == ' ' => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

/// Assemble a complete document: catalog, page tree, font, then one
/// page + content object pair per stream, followed by the xref table
fn assemble(streams: &[Vec<u8>]) -> Vec<u8> {
    let page_count = streams.len();
    let mut objects: Vec<Vec<u8>> = Vec::with_capacity(3 + page_count * 2);

    objects.push(b"<< /Type /Catalog /Pages 2 0 R >>".to_vec());

    let kids: Vec<String> = (0..page_count)
        .map(|i| format!("{} 0 R", 4 + i * 2))
        .collect();
    objects.push(
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            page_count
        )
        .into_bytes(),
    );

    objects.push(b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_vec());

    for (i, stream) in streams.iter().enumerate() {
        objects.push(
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
                 /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
                5 + i * 2
            )
            .into_bytes(),
        );
        let mut content = format!("<< /Length {} >>\nstream\n", stream.len()).into_bytes();
        content.extend_from_slice(stream);
        content.extend_from_slice(b"\nendstream");
        objects.push(content);
    }

    let mut out: Vec<u8> = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n", i + 1).as_bytes());
        out.extend_from_slice(body);
        out.extend_from_slice(b"\nendobj\n");
    }

    let xref_offset = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in offsets {
        out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_offset
        )
        .as_bytes(),
    );
    out
}
