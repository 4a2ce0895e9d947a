//! Result display: titled list of the selected variant URLs, or the viewer URL.

use std::io::{self, Write};

use crate::{UploadResult, VariantSelection};

/// Render the list body for one result (no title).
///
/// ```text
/// * Thumb URL
///   * https://host/x.th.png
/// ```
pub fn render_result(result: &UploadResult, selection: &VariantSelection) -> String {
    let mut out = String::new();
    if selection.is_empty() {
        push_item(&mut out, "URL Viewer", &result.url_viewer);
        return out;
    }
    for v in selection.selected() {
        push_item(&mut out, v.label(), &result.variant_url(v));
    }
    out
}

fn push_item(out: &mut String, label: &str, value: &str) {
    out.push_str("* ");
    out.push_str(label);
    out.push('\n');
    out.push_str("  * ");
    out.push_str(value);
    out.push('\n');
}

/// Write `title:`, an underline one longer than the title, the body, then a blank line.
pub fn write_titled<W: Write>(w: &mut W, title: &str, body: &str) -> io::Result<()> {
    writeln!(w, "{}:", title)?;
    writeln!(w, "{}", "-".repeat(title.chars().count() + 1))?;
    w.write_all(body.as_bytes())?;
    writeln!(w)
}

/// Render and write one result under its source reference.
pub fn write_result<W: Write>(
    w: &mut W,
    result: &UploadResult,
    selection: &VariantSelection,
) -> io::Result<()> {
    write_titled(w, &result.reference, &render_result(result, selection))
}
