//! Creative: dark slate sidebar carrying identity, contact and skills, with an
//! accent-marked main column on a pale background.

use crate::layout::flow::{Align, Canvas, Column};
use crate::layout::font_metrics::{FontFamily, FontWeight};
use crate::layout::fragment::{Element, Fragment, TextStyle, A4_WIDTH_PX};
use crate::models::ResumeData;
use crate::templates::palette::{SLATE_300, SLATE_50, SLATE_500, SLATE_600, SLATE_700, SLATE_800};
use crate::templates::sections::{contact_section, education_item, experience_item, section, EntryStyles};
use crate::templates::{
    RenderContext, LABEL_CONTACT, LABEL_EDUCATION, LABEL_EXPERIENCE, LABEL_SKILLS, LABEL_SUMMARY,
};

const SIDEBAR_WIDTH: f32 = A4_WIDTH_PX * 0.35;
const SIDEBAR_PADDING: f32 = 24.0;
const MAIN_PADDING: f32 = 32.0;
const PHOTO_SIZE: f32 = 96.0;
const MARKER_WIDTH: f32 = 4.0;

pub fn render(data: &ResumeData, ctx: &RenderContext) -> Fragment {
    let accent = ctx.accent.as_str();
    let mut canvas = Canvas::new();

    let sidebar_bottom = paint_sidebar(&mut canvas, data, accent);
    let main_bottom = paint_main(&mut canvas, data, accent);

    let height = ctx.page_height(sidebar_bottom.max(main_bottom));
    canvas.underlay(vec![
        Element::Rect {
            x: 0.0,
            y: 0.0,
            w: SIDEBAR_WIDTH,
            h: height,
            fill: SLATE_800.to_string(),
        },
        Element::Rect {
            x: SIDEBAR_WIDTH,
            y: 0.0,
            w: A4_WIDTH_PX - SIDEBAR_WIDTH,
            h: height,
            fill: SLATE_50.to_string(),
        },
    ]);
    canvas.finish("creative", accent, ctx.export_mode, A4_WIDTH_PX, height, SLATE_50)
}

fn paint_sidebar(canvas: &mut Canvas, data: &ResumeData, accent: &str) -> f32 {
    let info = &data.personal_info;
    let mut col = Column::new(SIDEBAR_PADDING, SIDEBAR_WIDTH - SIDEBAR_PADDING * 2.0, SIDEBAR_PADDING);

    if info.has_photo() {
        let r = PHOTO_SIZE / 2.0;
        canvas.photo(col.center_x(), col.y + r, r, &info.photo, Some((accent, 4.0)));
        col.gap(PHOTO_SIZE + 24.0);
    }

    let name_style = TextStyle::new(FontFamily::Sans, 30.0, FontWeight::Bold, accent).line_height(36.0 / 30.0);
    let name: &str = if info.full_name.trim().is_empty() { "O Seu Nome" } else { &info.full_name };
    col.paragraph(canvas, name, &name_style, Align::Center);
    col.gap(8.0);

    let title_style = TextStyle::new(FontFamily::Sans, 16.0, FontWeight::Light, SLATE_300).line_height(1.5);
    let title: &str = if info.job_title.trim().is_empty() { "Cargo" } else { &info.job_title };
    col.paragraph(canvas, title, &title_style, Align::Center);
    col.gap(24.0);
    col.rule(canvas, SLATE_600, 1.0);
    col.gap(24.0);

    let heading = TextStyle::new(FontFamily::Sans, 14.0, FontWeight::Semibold, accent)
        .uppercase()
        .tracking(0.05)
        .line_height(20.0 / 14.0);
    let small = TextStyle::new(FontFamily::Sans, 12.0, FontWeight::Regular, SLATE_300).line_height(16.0 / 12.0);
    let sidebar_header = |label: &'static str| {
        let heading = heading.clone();
        move |c: &mut Column, cv: &mut Canvas| {
            c.paragraph(cv, label, &heading, Align::Left);
            c.gap(12.0);
        }
    };

    let contacts = info.contact_lines();
    contact_section(canvas, &mut col, &contacts, sidebar_header(LABEL_CONTACT), &small, accent, 2.0);
    col.gap(24.0);

    let skills = data.filled_skills();
    section(canvas, &mut col, &skills, 4.0, sidebar_header(LABEL_SKILLS), |c, cv, skill| {
        c.bullet(cv, &skill.name, &small, accent);
    });

    col.y + SIDEBAR_PADDING
}

fn paint_main(canvas: &mut Canvas, data: &ResumeData, accent: &str) -> f32 {
    let mut col = Column::new(
        SIDEBAR_WIDTH + MAIN_PADDING,
        A4_WIDTH_PX - SIDEBAR_WIDTH - MAIN_PADDING * 2.0,
        MAIN_PADDING,
    );

    let heading = TextStyle::new(FontFamily::Sans, 18.0, FontWeight::Bold, accent)
        .uppercase()
        .tracking(0.05)
        .line_height(28.0 / 18.0);
    let body = TextStyle::new(FontFamily::Sans, 14.0, FontWeight::Regular, SLATE_700).line_height(20.0 / 14.0);
    let entry = EntryStyles {
        title: TextStyle::new(FontFamily::Sans, 16.0, FontWeight::Semibold, SLATE_800).line_height(1.5),
        meta: TextStyle::new(FontFamily::Sans, 14.0, FontWeight::Regular, SLATE_500).line_height(20.0 / 14.0),
        body: body.clone(),
        body_gap: 4.0,
    };

    // Headings sit behind a short accent bar, indented past it.
    let header = |label: &'static str| {
        let heading = heading.clone();
        let fill = accent.to_string();
        move |c: &mut Column, cv: &mut Canvas| {
            let bar_height = heading.line_advance() * 0.75;
            cv.rect(c.x, c.y + (heading.line_advance() - bar_height) / 2.0, MARKER_WIDTH, bar_height, &fill);
            let mut inner = Column::new(c.x + MARKER_WIDTH + 8.0, c.width - MARKER_WIDTH - 8.0, c.y);
            inner.paragraph(cv, label, &heading, Align::Left);
            c.y = inner.y;
            c.gap(12.0);
        }
    };

    if data.has_summary() {
        section(canvas, &mut col, &[data.summary.as_str()], 0.0, header(LABEL_SUMMARY), |c, cv, s| {
            c.paragraph(cv, s, &body, Align::Left);
        });
        col.gap(32.0);
    }

    let experience = data.filled_experience();
    if section(canvas, &mut col, &experience, 16.0, header(LABEL_EXPERIENCE), |c, cv, exp| {
        experience_item(c, cv, exp, &entry)
    }) {
        col.gap(16.0);
    }

    let education = data.filled_education();
    section(canvas, &mut col, &education, 16.0, header(LABEL_EDUCATION), |c, cv, edu| {
        education_item(c, cv, edu, &entry)
    });

    col.y + MAIN_PADDING
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::tests::{full_resume, with_photo};

    fn ctx(export_mode: bool) -> RenderContext {
        RenderContext { accent: "#06B6D4".to_string(), export_mode }
    }

    #[test]
    fn test_sidebar_and_main_backgrounds_underlay_content() {
        let fragment = render(&full_resume(), &ctx(true));
        match (&fragment.elements[0], &fragment.elements[1]) {
            (Element::Rect { fill: side, h: side_h, .. }, Element::Rect { fill: main, x, .. }) => {
                assert_eq!(side, SLATE_800);
                assert_eq!(main, SLATE_50);
                assert_eq!(*side_h, fragment.height);
                assert!((*x - SIDEBAR_WIDTH).abs() < 1e-3);
            }
            other => panic!("expected two background rects, got {other:?}"),
        }
    }

    #[test]
    fn test_name_uses_accent_and_placeholder() {
        let fragment = render(&ResumeData::default(), &ctx(false));
        let name = fragment.text_runs().find(|r| r.text == "O Seu Nome").unwrap();
        assert_eq!(name.style.fill, "#06B6D4");
        assert!(fragment.contains_text("Cargo"));
        assert!(fragment.contains_text(LABEL_CONTACT), "contact header renders without contacts");
    }

    #[test]
    fn test_photo_has_accent_border() {
        let fragment = render(&with_photo(full_resume()), &ctx(false));
        let border = fragment.elements.iter().find_map(|e| match e {
            Element::Photo { border, .. } => border.clone(),
            _ => None,
        });
        assert_eq!(border, Some(("#06B6D4".to_string(), 4.0)));
    }

    #[test]
    fn test_section_headings_carry_marker() {
        let fragment = render(&full_resume(), &ctx(false));
        let heading = fragment.text_runs().find(|r| r.text == LABEL_EXPERIENCE).unwrap();
        assert!(heading.x > SIDEBAR_WIDTH + MAIN_PADDING);
        let has_marker = fragment.elements.iter().any(|e| {
            matches!(e, Element::Rect { w, fill, .. } if *w == MARKER_WIDTH && fill == "#06B6D4")
        });
        assert!(has_marker);
    }
}
