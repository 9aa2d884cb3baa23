//! Minimal SVG badge synthesis and validation
//!
//! Generators are free to produce whatever SVG they like; this module only
//! provides the flat two-panel badge used by the built-in generators and
//! the error fallback, plus the well-formedness gate the resolver applies
//! to every generator's output.

/// Approximate glyph width used for panel sizing, in pixels.
const CHAR_WIDTH: usize = 7;
const PADDING: usize = 10;

/// Cheap structural check that `bytes` look like an SVG document.
///
/// Deliberately shallow: UTF-8, an `<svg` root (an XML prolog is fine),
/// and a matching close tag. Anything stricter belongs to the generator.
pub fn is_well_formed(bytes: &[u8]) -> bool {
    let Ok(text) = std::str::from_utf8(bytes) else {
        return false;
    };
    let trimmed = text.trim_start();

    let body = if let Some(rest) = trimmed.strip_prefix("<?xml") {
        match rest.split_once("?>") {
            Some((_, body)) => body.trim_start(),
            None => return false,
        }
    } else {
        trimmed
    };

    body.starts_with("<svg") && body.trim_end().ends_with("</svg>")
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render a flat two-panel badge.
pub fn flat_badge(label: &str, status: &str, label_color: &str, status_color: &str) -> Vec<u8> {
    let label_width = label.chars().count() * CHAR_WIDTH + PADDING;
    let status_width = status.chars().count() * CHAR_WIDTH + PADDING;
    let width = label_width + status_width;

    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="20">"#,
            r#"<rect width="{lw}" height="20" fill="{lc}"/>"#,
            r#"<rect x="{lw}" width="{sw}" height="20" fill="{sc}"/>"#,
            r##"<g fill="#fff" font-family="Verdana,sans-serif" font-size="11" text-anchor="middle">"##,
            r#"<text x="{lx}" y="14">{label}</text>"#,
            r#"<text x="{sx}" y="14">{status}</text>"#,
            "</g></svg>"
        ),
        w = width,
        lw = label_width,
        sw = status_width,
        lc = escape(label_color),
        sc = escape(status_color),
        lx = label_width / 2,
        sx = label_width + status_width / 2,
        label = escape(label),
        status = escape(status),
    )
    .into_bytes()
}

/// The synthesized fallback artifact for a failed generation.
///
/// Must never fail and must stay deterministic: the generator id is the
/// only diagnostic a caller gets.
pub fn error_badge(generator: &str) -> Vec<u8> {
    flat_badge("error", generator, "#e43", "#555")
}
