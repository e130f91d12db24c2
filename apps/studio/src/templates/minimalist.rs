//! Minimalist: one centred column, accent used only for the job title and
//! section headings.

use crate::layout::flow::{Align, Canvas, Column};
use crate::layout::font_metrics::{FontFamily, FontWeight};
use crate::layout::fragment::{Fragment, TextStyle, A4_WIDTH_PX};
use crate::models::ResumeData;
use crate::templates::palette::{GRAY_200, GRAY_600, GRAY_700, GRAY_900, WHITE};
use crate::templates::sections::{education_item, experience_item, section, EntryStyles};
use crate::templates::{RenderContext, LABEL_EDUCATION, LABEL_EXPERIENCE, LABEL_SKILLS};

const PADDING: f32 = 32.0;
const PHOTO_SIZE: f32 = 112.0;

pub fn render(data: &ResumeData, ctx: &RenderContext) -> Fragment {
    let accent = ctx.accent.as_str();
    let info = &data.personal_info;
    let experience = data.filled_experience();
    let education = data.filled_education();
    let skills = data.filled_skills();

    let mut canvas = Canvas::new();
    let mut col = Column::new(PADDING, A4_WIDTH_PX - PADDING * 2.0, PADDING);

    // Header
    if info.has_photo() {
        let r = PHOTO_SIZE / 2.0;
        canvas.photo(col.center_x(), col.y + r, r, &info.photo, None);
        col.gap(PHOTO_SIZE + 16.0);
    }
    let name_style = TextStyle::new(FontFamily::Sans, 36.0, FontWeight::Bold, GRAY_900)
        .tracking(-0.025)
        .line_height(40.0 / 36.0);
    let name: &str = if info.full_name.trim().is_empty() { "O Seu Nome Aqui" } else { &info.full_name };
    col.paragraph(&mut canvas, name, &name_style, Align::Center);

    let title_style = TextStyle::new(FontFamily::Sans, 20.0, FontWeight::Light, accent)
        .tracking(0.025)
        .line_height(1.4);
    let title: &str = if info.job_title.trim().is_empty() { "Cargo Desejado" } else { &info.job_title };
    col.paragraph(&mut canvas, title, &title_style, Align::Center);

    let contacts: Vec<&str> = info.contact_lines().into_iter().map(|(_, v)| v).collect();
    if !contacts.is_empty() {
        col.gap(16.0);
        let contact_style = TextStyle::new(FontFamily::Sans, 12.0, FontWeight::Regular, GRAY_700).line_height(16.0 / 12.0);
        col.paragraph(&mut canvas, &contacts.join(" • "), &contact_style, Align::Center);
    }
    col.gap(32.0);

    let body = TextStyle::new(FontFamily::Sans, 14.0, FontWeight::Regular, GRAY_700).line_height(20.0 / 14.0);
    if data.has_summary() {
        let top = col.y;
        col.paragraph(&mut canvas, &data.summary, &body, Align::Center);
        canvas.keep_together(top, col.y);
        col.gap(24.0);
    }

    col.gap(24.0);
    col.rule(&mut canvas, GRAY_200, 1.0);
    col.gap(24.0);

    // Sections
    let heading = TextStyle::new(FontFamily::Sans, 18.0, FontWeight::Bold, accent)
        .uppercase()
        .tracking(0.05)
        .line_height(28.0 / 18.0);
    let entry = EntryStyles {
        title: TextStyle::new(FontFamily::Sans, 16.0, FontWeight::Semibold, GRAY_900).line_height(1.5),
        meta: TextStyle::new(FontFamily::Sans, 14.0, FontWeight::Regular, GRAY_600).line_height(20.0 / 14.0),
        body: body.clone(),
        body_gap: 4.0,
    };
    let header = |label: &'static str| {
        let heading = heading.clone();
        move |c: &mut Column, cv: &mut Canvas| {
            c.paragraph(cv, label, &heading, Align::Left);
            c.gap(16.0);
        }
    };

    if section(&mut canvas, &mut col, &experience, 16.0, header(LABEL_EXPERIENCE), |c, cv, exp| {
        experience_item(c, cv, exp, &entry)
    }) {
        col.gap(24.0);
    }

    if section(&mut canvas, &mut col, &education, 16.0, header(LABEL_EDUCATION), |c, cv, edu| {
        education_item(c, cv, edu, &entry)
    }) {
        col.gap(24.0);
    }

    // Skills render as one joined line, so the whole list is a single item.
    if !skills.is_empty() {
        let joined = skills.iter().map(|s| s.name.as_str()).collect::<Vec<_>>().join(" • ");
        section(&mut canvas, &mut col, &[joined], 0.0, header(LABEL_SKILLS), |c, cv, line| {
            c.paragraph(cv, line, &body, Align::Left);
        });
    }

    let height = ctx.page_height(col.y + PADDING);
    canvas.finish("minimalist", accent, ctx.export_mode, A4_WIDTH_PX, height, WHITE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::tests::{full_resume, with_photo};

    fn ctx(export_mode: bool) -> RenderContext {
        RenderContext { accent: "#475569".to_string(), export_mode }
    }

    #[test]
    fn test_placeholders_for_empty_identity() {
        let fragment = render(&ResumeData::default(), &ctx(false));
        assert!(fragment.contains_text("O Seu Nome Aqui"));
        assert!(fragment.contains_text("Cargo Desejado"));
    }

    #[test]
    fn test_skills_joined_with_bullets() {
        let fragment = render(&full_resume(), &ctx(false));
        assert!(fragment.contains_text("Go • Rust"), "{}", fragment.text_content());
    }

    #[test]
    fn test_contact_line_joins_present_fields() {
        let fragment = render(&full_resume(), &ctx(false));
        assert!(fragment.contains_text("ana.silva@example.com"));
        assert!(fragment.text_content().contains("•"));
    }

    #[test]
    fn test_photo_pushes_header_down() {
        let plain = render(&full_resume(), &ctx(false));
        let photo = render(&with_photo(full_resume()), &ctx(false));
        let first_baseline = |f: &Fragment| f.text_runs().next().map(|r| r.y).unwrap_or_default();
        assert!(first_baseline(&photo) > first_baseline(&plain) + PHOTO_SIZE);
    }

    #[test]
    fn test_job_title_uses_accent() {
        let fragment = render(&full_resume(), &ctx(false));
        let title = fragment.text_runs().find(|r| r.text == "Engenheira de Software").unwrap();
        assert_eq!(title.style.fill, "#475569");
    }
}
