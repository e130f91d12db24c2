//! Modern: accent-coloured sidebar (one third) with identity, contact and
//! skills; summary, experience and education in the main column.

use crate::layout::flow::{Align, Canvas, Column};
use crate::layout::font_metrics::{FontFamily, FontWeight};
use crate::layout::fragment::{Element, Fragment, TextStyle, A4_WIDTH_PX};
use crate::models::ResumeData;
use crate::templates::palette::{GRAY_600, GRAY_700, GRAY_800, WHITE, WHITE_HALF};
use crate::templates::sections::{education_item, experience_item, section, EntryStyles};
use crate::templates::{
    RenderContext, LABEL_CONTACT, LABEL_EDUCATION, LABEL_EXPERIENCE, LABEL_SKILLS, LABEL_SUMMARY,
};

const PADDING: f32 = 32.0;
const PHOTO_SIZE: f32 = 128.0;
const SIDEBAR_WIDTH: f32 = A4_WIDTH_PX / 3.0;

pub fn render(data: &ResumeData, ctx: &RenderContext) -> Fragment {
    let accent = ctx.accent.as_str();
    let mut canvas = Canvas::new();

    let sidebar_bottom = paint_sidebar(&mut canvas, data, accent);
    let main_bottom = paint_main(&mut canvas, data, accent);

    let height = ctx.page_height(sidebar_bottom.max(main_bottom));
    canvas.underlay(vec![Element::Rect {
        x: 0.0,
        y: 0.0,
        w: SIDEBAR_WIDTH,
        h: height,
        fill: accent.to_string(),
    }]);
    canvas.finish("modern", accent, ctx.export_mode, A4_WIDTH_PX, height, WHITE)
}

fn paint_sidebar(canvas: &mut Canvas, data: &ResumeData, accent: &str) -> f32 {
    let info = &data.personal_info;
    let mut col = Column::new(PADDING, SIDEBAR_WIDTH - PADDING * 2.0, PADDING);

    if info.has_photo() {
        let r = PHOTO_SIZE / 2.0;
        canvas.photo(col.center_x(), col.y + r, r, &info.photo, Some((WHITE_HALF, 4.0)));
        col.gap(PHOTO_SIZE + 24.0);
    }

    let name_style = TextStyle::new(FontFamily::Sans, 30.0, FontWeight::Bold, WHITE).line_height(36.0 / 30.0);
    let name: &str = if info.full_name.trim().is_empty() { "O Seu Nome" } else { &info.full_name };
    col.paragraph(canvas, name, &name_style, Align::Left);

    let title_style = TextStyle::new(FontFamily::Sans, 18.0, FontWeight::Light, WHITE).line_height(28.0 / 18.0);
    let title: &str = if info.job_title.trim().is_empty() { "Cargo" } else { &info.job_title };
    col.paragraph(canvas, title, &title_style, Align::Left);
    col.gap(32.0);

    let heading = TextStyle::new(FontFamily::Sans, 14.0, FontWeight::Bold, WHITE)
        .uppercase()
        .tracking(0.1)
        .line_height(20.0 / 14.0);
    let small = TextStyle::new(FontFamily::Sans, 12.0, FontWeight::Regular, WHITE).line_height(16.0 / 12.0);
    let sidebar_header = |label: &'static str| {
        let heading = heading.clone();
        move |c: &mut Column, cv: &mut Canvas| {
            c.paragraph(cv, label, &heading, Align::Left);
            c.gap(4.0);
            c.rule(cv, WHITE_HALF, 1.0);
            c.gap(12.0);
        }
    };

    // The contact block always renders, listing whichever fields are filled.
    let contacts: Vec<&str> = info.contact_lines().into_iter().map(|(_, v)| v).collect();
    let header_top = col.y;
    sidebar_header(LABEL_CONTACT)(&mut col, &mut *canvas);
    for (i, value) in contacts.iter().enumerate() {
        let top = if i == 0 { header_top } else { col.y };
        col.paragraph(canvas, value, &small, Align::Left);
        col.gap(4.0);
        canvas.keep_together(top, col.y);
    }
    col.gap(24.0);

    let skills = data.filled_skills();
    section(canvas, &mut col, &skills, 0.0, sidebar_header(LABEL_SKILLS), |c, cv, skill| {
        c.bullet(cv, &skill.name, &small, WHITE);
    });

    col.y + PADDING
}

fn paint_main(canvas: &mut Canvas, data: &ResumeData, accent: &str) -> f32 {
    let mut col = Column::new(SIDEBAR_WIDTH + PADDING, A4_WIDTH_PX - SIDEBAR_WIDTH - PADDING * 2.0, PADDING);

    let heading = TextStyle::new(FontFamily::Sans, 18.0, FontWeight::Bold, accent)
        .uppercase()
        .tracking(0.05)
        .line_height(28.0 / 18.0);
    let body = TextStyle::new(FontFamily::Sans, 14.0, FontWeight::Regular, GRAY_700).line_height(20.0 / 14.0);
    let entry = EntryStyles {
        title: TextStyle::new(FontFamily::Sans, 16.0, FontWeight::Semibold, GRAY_800).line_height(1.5),
        meta: TextStyle::new(FontFamily::Sans, 14.0, FontWeight::Regular, GRAY_600).line_height(20.0 / 14.0),
        body: body.clone(),
        body_gap: 4.0,
    };
    let header = |label: &'static str| {
        let heading = heading.clone();
        move |c: &mut Column, cv: &mut Canvas| {
            c.paragraph(cv, label, &heading, Align::Left);
            c.gap(8.0);
        }
    };

    if data.has_summary() {
        section(canvas, &mut col, &[data.summary.as_str()], 0.0, header(LABEL_SUMMARY), |c, cv, s| {
            c.paragraph(cv, s, &body, Align::Left);
        });
        col.gap(24.0);
    }

    let experience = data.filled_experience();
    if section(canvas, &mut col, &experience, 16.0, header(LABEL_EXPERIENCE), |c, cv, exp| {
        experience_item(c, cv, exp, &entry)
    }) {
        col.gap(8.0);
    }

    let education = data.filled_education();
    section(canvas, &mut col, &education, 16.0, header(LABEL_EDUCATION), |c, cv, edu| {
        education_item(c, cv, edu, &entry)
    });

    col.y + PADDING
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::tests::full_resume;

    fn ctx(export_mode: bool) -> RenderContext {
        RenderContext { accent: "#4F46E5".to_string(), export_mode }
    }

    #[test]
    fn test_sidebar_spans_full_page_height() {
        let fragment = render(&full_resume(), &ctx(true));
        match &fragment.elements[0] {
            Element::Rect { h, fill, w, .. } => {
                assert_eq!(*h, fragment.height);
                assert_eq!(fill, "#4F46E5");
                assert!((*w - A4_WIDTH_PX / 3.0).abs() < 1e-3);
            }
            other => panic!("expected sidebar rect first, got {other:?}"),
        }
    }

    #[test]
    fn test_contact_header_renders_without_contacts() {
        let fragment = render(&ResumeData::default(), &ctx(false));
        assert!(fragment.contains_text(LABEL_CONTACT));
        assert!(fragment.contains_text("O Seu Nome"));
        assert!(fragment.contains_text("Cargo"));
    }

    #[test]
    fn test_experience_lives_in_main_column() {
        let fragment = render(&full_resume(), &ctx(false));
        let run = fragment.text_runs().find(|r| r.text == "Dev").unwrap();
        assert!(run.x >= SIDEBAR_WIDTH);
        let skill = fragment.text_runs().find(|r| r.text == "Rust").unwrap();
        assert!(skill.x < SIDEBAR_WIDTH);
    }
}
