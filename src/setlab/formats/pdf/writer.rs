//! Minimal PDF 1.4 serializer
//!
//! Writes laid-out pages using the three standard Type1 fonts, so no font data is
//! embedded. Text is encoded for WinAnsi; set-algebra symbols outside that encoding are
//! transliterated to ASCII. The output is pure ASCII, so byte offsets equal string
//! offsets.

use crate::setlab::formats::pdf::flow::{Font, Page, PageGeometry};
use std::fmt::Write as _;

const CATALOG_ID: usize = 1;
const PAGES_ID: usize = 2;
const FIRST_FONT_ID: usize = 3;

fn font_id(font: Font) -> usize {
    FIRST_FONT_ID
        + Font::ALL
            .iter()
            .position(|candidate| *candidate == font)
            .unwrap_or(0)
}

fn first_page_id() -> usize {
    FIRST_FONT_ID + Font::ALL.len()
}

/// Serialize pages into a complete PDF document
pub fn render(pages: &[Page], geometry: PageGeometry) -> String {
    let page_ids: Vec<usize> = (0..pages.len())
        .map(|index| first_page_id() + 2 * index)
        .collect();

    let mut objects: Vec<String> = Vec::new();
    objects.push(format!("<< /Type /Catalog /Pages {PAGES_ID} 0 R >>"));
    objects.push(format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        page_ids
            .iter()
            .map(|id| format!("{id} 0 R"))
            .collect::<Vec<_>>()
            .join(" "),
        pages.len()
    ));
    for font in Font::ALL {
        objects.push(format!(
            "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
            font.base_font()
        ));
    }

    let font_resources = Font::ALL
        .iter()
        .map(|font| format!("/{} {} 0 R", font.resource(), font_id(*font)))
        .collect::<Vec<_>>()
        .join(" ");

    for (page, page_id) in pages.iter().zip(&page_ids) {
        objects.push(format!(
            "<< /Type /Page /Parent {PAGES_ID} 0 R /MediaBox [0 0 {:.2} {:.2}] /Resources << /Font << {font_resources} >> >> /Contents {} 0 R >>",
            geometry.width,
            geometry.height,
            page_id + 1
        ));
        let content = content_stream(page);
        objects.push(format!(
            "<< /Length {} >>\nstream\n{content}\nendstream",
            content.len()
        ));
    }

    let mut out = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (index, object) in objects.iter().enumerate() {
        offsets.push(out.len());
        let _ = write!(out, "{} 0 obj\n{object}\nendobj\n", index + 1);
    }

    let xref_offset = out.len();
    let _ = write!(out, "xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in &offsets {
        let _ = writeln!(out, "{offset:010} 00000 n ");
    }
    let _ = write!(
        out,
        "trailer\n<< /Size {} /Root {CATALOG_ID} 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
        objects.len() + 1
    );
    out
}

fn content_stream(page: &Page) -> String {
    page.runs
        .iter()
        .map(|run| {
            format!(
                "BT /{} {} Tf {:.2} {:.2} Td ({}) Tj ET",
                run.font.resource(),
                run.size,
                run.x,
                run.y,
                encode_text(&run.text)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Encode text as the body of a PDF literal string in WinAnsi
pub fn encode_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            ' '..='~' => out.push(ch),
            '\t' => out.push(' '),
            _ => match win_ansi_code(ch) {
                Some(code) => {
                    let _ = write!(out, "\\{code:03o}");
                }
                None => out.push_str(transliterate(ch)),
            },
        }
    }
    out
}

fn win_ansi_code(ch: char) -> Option<u8> {
    let code = match ch {
        '€' => 0x80,
        '…' => 0x85,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '™' => 0x99,
        // Empty-set sign drawn as a slashed O
        '∅' => 0xD8,
        _ => {
            let value = u32::from(ch);
            return if (0xA0..=0xFF).contains(&value) {
                u8::try_from(value).ok()
            } else {
                None
            };
        }
    };
    Some(code)
}

fn transliterate(ch: char) -> &'static str {
    match ch {
        '∪' => "|",
        '∩' => "&",
        'Δ' => "^",
        '⊆' => "<=",
        '⊇' => ">=",
        '✓' => "x",
        '≈' => "~",
        _ => "?",
    }
}
