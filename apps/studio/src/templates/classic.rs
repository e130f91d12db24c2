//! Classic: serif type, centred header with an optional photo on the left,
//! accent rules around the summary, and a two-thirds / one-third body.

use crate::layout::flow::{Align, Canvas, Column};
use crate::layout::font_metrics::{FontFamily, FontWeight};
use crate::layout::fragment::{Fragment, TextStyle, A4_WIDTH_PX};
use crate::models::ResumeData;
use crate::templates::palette::{GRAY_200, GRAY_600, GRAY_700, GRAY_800, GRAY_900, WHITE};
use crate::templates::sections::{contact_section, education_item, experience_item, section, EntryStyles};
use crate::templates::{RenderContext, LABEL_CONTACT, LABEL_EDUCATION, LABEL_EXPERIENCE, LABEL_SKILLS};

const PADDING: f32 = 32.0;
const PHOTO_SIZE: f32 = 112.0;
const GUTTER: f32 = 24.0;

pub fn render(data: &ResumeData, ctx: &RenderContext) -> Fragment {
    let accent = ctx.accent.as_str();
    let info = &data.personal_info;
    let mut canvas = Canvas::new();
    let content_width = A4_WIDTH_PX - PADDING * 2.0;

    // Header row
    let header_top = PADDING;
    let (text_x, text_width) = if info.has_photo() {
        let r = PHOTO_SIZE / 2.0;
        canvas.photo(PADDING + r, header_top + r, r, &info.photo, Some((accent, 4.0)));
        let offset = PHOTO_SIZE + GUTTER;
        (PADDING + offset, content_width - offset)
    } else {
        (PADDING, content_width)
    };
    let mut head = Column::new(text_x, text_width, header_top);

    let name_style = TextStyle::new(FontFamily::Serif, 30.0, FontWeight::Bold, GRAY_900)
        .tracking(0.05)
        .line_height(36.0 / 30.0);
    let name: &str = if info.full_name.trim().is_empty() { "O Seu Nome Aqui" } else { &info.full_name };
    head.paragraph(&mut canvas, name, &name_style, Align::Center);

    if !info.job_title.trim().is_empty() {
        head.gap(4.0);
        let title_style = TextStyle::new(FontFamily::Serif, 18.0, FontWeight::Light, accent).line_height(28.0 / 18.0);
        head.paragraph(&mut canvas, &info.job_title, &title_style, Align::Center);
    }

    let photo_bottom = if info.has_photo() { header_top + PHOTO_SIZE } else { header_top };
    let mut col = Column::new(PADDING, content_width, head.y.max(photo_bottom));
    canvas.keep_together(header_top, col.y);

    if data.has_summary() {
        col.gap(24.0);
        let top = col.y;
        col.rule(&mut canvas, accent, 2.0);
        col.gap(16.0);
        let summary_style =
            TextStyle::new(FontFamily::Serif, 14.0, FontWeight::Regular, GRAY_800).line_height(1.625);
        col.paragraph(&mut canvas, &data.summary, &summary_style, Align::Center);
        col.gap(16.0);
        col.rule(&mut canvas, accent, 2.0);
        canvas.keep_together(top, col.y);
    }
    col.gap(24.0);

    // Body
    let body_top = col.y;
    let left_width = (content_width - GUTTER) * 2.0 / 3.0;
    let right_x = PADDING + left_width + GUTTER;
    let mut left = Column::new(PADDING, left_width, body_top);
    let mut right = Column::new(right_x, content_width - left_width - GUTTER, body_top);

    let heading = TextStyle::new(FontFamily::Serif, 18.0, FontWeight::Bold, accent)
        .uppercase()
        .line_height(28.0 / 18.0);
    let body = TextStyle::new(FontFamily::Serif, 14.0, FontWeight::Regular, GRAY_700).line_height(20.0 / 14.0);
    let entry = EntryStyles {
        title: TextStyle::new(FontFamily::Serif, 16.0, FontWeight::Semibold, GRAY_800).line_height(1.5),
        meta: TextStyle::new(FontFamily::Serif, 14.0, FontWeight::Regular, GRAY_600).line_height(20.0 / 14.0),
        body: body.clone(),
        body_gap: 8.0,
    };
    let header = |label: &'static str| {
        let heading = heading.clone();
        move |c: &mut Column, cv: &mut Canvas| {
            c.paragraph(cv, label, &heading, Align::Left);
            c.gap(4.0);
            c.rule(cv, GRAY_200, 1.0);
            c.gap(12.0);
        }
    };

    let experience = data.filled_experience();
    let painted_experience = section(&mut canvas, &mut left, &experience, 16.0, header(LABEL_EXPERIENCE), |c, cv, exp| {
        experience_item(c, cv, exp, &entry)
    });
    let education = data.filled_education();
    if painted_experience && !education.is_empty() {
        left.gap(24.0);
    }
    section(&mut canvas, &mut left, &education, 16.0, header(LABEL_EDUCATION), |c, cv, edu| {
        education_item(c, cv, edu, &entry)
    });

    let contacts = info.contact_lines();
    contact_section(&mut canvas, &mut right, &contacts, header(LABEL_CONTACT), &body, accent, 6.0);
    right.gap(24.0);

    let skills = data.filled_skills();
    section(&mut canvas, &mut right, &skills, 0.0, header(LABEL_SKILLS), |c, cv, skill| {
        c.gap(4.0);
        c.bullet(cv, &skill.name, &body, accent);
        c.gap(4.0);
    });

    let body_bottom = left.y.max(right.y);
    if body_bottom > body_top {
        canvas.vline(right_x - GUTTER / 2.0, body_top, body_bottom, GRAY_200, 1.0);
    }

    let height = ctx.page_height(body_bottom + PADDING);
    canvas.finish("classic", accent, ctx.export_mode, A4_WIDTH_PX, height, WHITE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::fragment::Element;
    use crate::templates::tests::{full_resume, with_photo};

    fn ctx(export_mode: bool) -> RenderContext {
        RenderContext { accent: "#2563EB".to_string(), export_mode }
    }

    #[test]
    fn test_empty_job_title_is_omitted() {
        let fragment = render(&ResumeData::default(), &ctx(false));
        assert!(fragment.contains_text("O Seu Nome Aqui"));
        assert!(!fragment.contains_text("Cargo"));
    }

    #[test]
    fn test_uses_serif_family() {
        let fragment = render(&full_resume(), &ctx(false));
        assert!(fragment.text_runs().all(|r| r.style.font == FontFamily::Serif));
    }

    #[test]
    fn test_summary_framed_by_accent_rules() {
        let fragment = render(&full_resume(), &ctx(false));
        let accent_rules = fragment
            .elements
            .iter()
            .filter(|e| matches!(e, Element::Line { stroke, width, .. } if stroke == "#2563EB" && *width == 2.0))
            .count();
        assert_eq!(accent_rules, 2);
    }

    #[test]
    fn test_contacts_and_skills_in_right_column() {
        let fragment = render(&full_resume(), &ctx(false));
        let split = PADDING + (A4_WIDTH_PX - PADDING * 2.0 - GUTTER) * 2.0 / 3.0;
        let skill = fragment.text_runs().find(|r| r.text == "Rust").unwrap();
        assert!(skill.x > split);
        let email = fragment.text_runs().find(|r| r.text == "ana.silva@example.com").unwrap();
        assert!(email.x > split);
        let role = fragment.text_runs().find(|r| r.text == "Dev").unwrap();
        assert!(role.x < split);
    }

    #[test]
    fn test_contact_header_renders_without_contacts() {
        let fragment = render(&ResumeData::default(), &ctx(false));
        assert!(fragment.contains_text(LABEL_CONTACT));
        assert!(!fragment.contains_text(LABEL_SKILLS), "empty skills still skip their header");
    }

    #[test]
    fn test_photo_shifts_name_centre_right() {
        let plain = render(&full_resume(), &ctx(false));
        let photo = render(&with_photo(full_resume()), &ctx(false));
        let name_x = |f: &Fragment| f.text_runs().find(|r| r.text == "Ana Silva").map(|r| r.x).unwrap_or_default();
        assert!(name_x(&photo) > name_x(&plain));
    }
}
