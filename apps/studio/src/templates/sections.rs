//! Building blocks the four templates share: section scaffolding with
//! pagination hints, entry painters, and contact markers.

use crate::layout::flow::{Align, Canvas, Column};
use crate::layout::fragment::{Element, TextStyle};
use crate::models::resume::{EducationEntry, ExperienceEntry};
use crate::models::ContactKind;
use crate::templates::entry_meta;

/// Text styles for the title / meta / body lines of an entry.
pub(super) struct EntryStyles {
    pub title: TextStyle,
    pub meta: TextStyle,
    pub body: TextStyle,
    /// Space between the meta line and the description (`mt-1` / `mb-1`).
    pub body_gap: f32,
}

/// Paints a section header followed by its items.
///
/// Paints nothing and returns `false` for an empty item list, so no header is
/// ever orphaned. The header is kept on the same page as the first item; each
/// later item is its own unbreakable block. `item_gap` is added after every item.
pub(super) fn section<T>(
    canvas: &mut Canvas,
    col: &mut Column,
    items: &[T],
    item_gap: f32,
    header: impl FnOnce(&mut Column, &mut Canvas),
    mut item: impl FnMut(&mut Column, &mut Canvas, &T),
) -> bool {
    if items.is_empty() {
        return false;
    }
    let header_top = col.y;
    header(col, canvas);
    for (i, it) in items.iter().enumerate() {
        let top = if i == 0 { header_top } else { col.y };
        item(col, canvas, it);
        canvas.keep_together(top, col.y);
        col.gap(item_gap);
    }
    true
}

pub(super) fn experience_item(col: &mut Column, canvas: &mut Canvas, exp: &ExperienceEntry, styles: &EntryStyles) {
    col.paragraph(canvas, &exp.role, &styles.title, Align::Left);
    col.paragraph(
        canvas,
        &entry_meta(&exp.company, &exp.start_date, exp.end_label()),
        &styles.meta,
        Align::Left,
    );
    if !exp.description.trim().is_empty() {
        col.gap(styles.body_gap);
        col.paragraph(canvas, &exp.description, &styles.body, Align::Left);
    }
}

pub(super) fn education_item(col: &mut Column, canvas: &mut Canvas, edu: &EducationEntry, styles: &EntryStyles) {
    col.paragraph(canvas, &edu.degree, &styles.title, Align::Left);
    col.paragraph(
        canvas,
        &entry_meta(&edu.institution, &edu.start_date, &edu.end_date),
        &styles.meta,
        Align::Left,
    );
}

/// Paints the contact section: the header always, then whichever lines are
/// filled. Header and lines stay on one page.
pub(super) fn contact_section(
    canvas: &mut Canvas,
    col: &mut Column,
    lines: &[(ContactKind, &str)],
    header: impl FnOnce(&mut Column, &mut Canvas),
    style: &TextStyle,
    marker_fill: &str,
    row_padding: f32,
) {
    let top = col.y;
    header(col, canvas);
    contact_list(col, canvas, lines, style, marker_fill, row_padding);
    canvas.keep_together(top, col.y);
}

/// Paints contact lines with a small marker in front of each, standing in for
/// the channel icons. Each line is a block of its own.
fn contact_list(
    col: &mut Column,
    canvas: &mut Canvas,
    lines: &[(ContactKind, &str)],
    style: &TextStyle,
    marker_fill: &str,
    row_padding: f32,
) {
    let indent = style.size_px * 1.6;
    for (kind, value) in lines {
        let top = col.y;
        col.gap(row_padding);
        let mid = col.y + style.line_advance() / 2.0;
        let mut inner = Column::new(col.x + indent, col.width - indent, col.y);
        inner.paragraph(canvas, value, style, Align::Left);
        canvas.push(contact_marker(*kind, col.x + indent * 0.35, mid, style.size_px * 0.3, marker_fill));
        col.y = inner.y + row_padding;
        canvas.keep_together(top, col.y);
    }
}

/// Markers differ by channel so a column of contacts stays scannable.
fn contact_marker(kind: ContactKind, cx: f32, cy: f32, r: f32, fill: &str) -> Element {
    match kind {
        ContactKind::Email | ContactKind::Phone => Element::Dot { cx, cy, r, fill: fill.to_string() },
        ContactKind::Address | ContactKind::Linkedin => Element::Rect {
            x: cx - r,
            y: cy - r,
            w: r * 2.0,
            h: r * 2.0,
            fill: fill.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::{FontFamily, FontWeight};

    fn text(size: f32) -> TextStyle {
        TextStyle::new(FontFamily::Sans, size, FontWeight::Regular, "#000")
    }

    #[test]
    fn test_section_skips_empty_items() {
        let mut canvas = Canvas::new();
        let mut col = Column::new(0.0, 300.0, 0.0);
        let painted = section(
            &mut canvas,
            &mut col,
            &Vec::<u8>::new(),
            16.0,
            |c, cv| {
                c.paragraph(cv, "Header", &text(18.0), Align::Left);
            },
            |_, _, _| {},
        );
        assert!(!painted);
        assert_eq!(col.y, 0.0);
    }

    #[test]
    fn test_section_glues_header_to_first_item() {
        let mut canvas = Canvas::new();
        let mut col = Column::new(0.0, 300.0, 10.0);
        section(
            &mut canvas,
            &mut col,
            &["a", "b"],
            8.0,
            |c, cv| {
                c.paragraph(cv, "Header", &text(18.0), Align::Left);
            },
            |c, cv, s| {
                c.paragraph(cv, s, &text(14.0), Align::Left);
            },
        );
        let fragment = canvas.finish("t", "#000", false, 300.0, col.y, "#FFFFFF");
        assert_eq!(fragment.blocks.len(), 2);
        assert_eq!(fragment.blocks[0].top, 10.0, "first block starts at the header");
        assert!(fragment.blocks[1].top >= fragment.blocks[0].bottom);
    }

    #[test]
    fn test_contact_list_paints_one_marker_per_line() {
        let mut canvas = Canvas::new();
        let mut col = Column::new(0.0, 200.0, 0.0);
        let lines = [(ContactKind::Email, "ana@example.com"), (ContactKind::Address, "Lisboa")];
        contact_list(&mut col, &mut canvas, &lines, &text(12.0), "#2563EB", 4.0);
        let fragment = canvas.finish("t", "#000", false, 200.0, col.y, "#FFFFFF");
        assert_eq!(fragment.text_runs().count(), 2);
        let markers = fragment
            .elements
            .iter()
            .filter(|e| matches!(e, Element::Dot { .. } | Element::Rect { .. }))
            .count();
        assert_eq!(markers, 2);
    }
}
