//! Template registry and renderer entry point.
//!
//! Every visual style is a plain function `(&ResumeData, &RenderContext) -> Fragment`
//! registered in a static list. The list is the whole template set: there is no
//! runtime registration, and its order is what the selection UI shows.

pub mod accent;
pub mod classic;
pub mod creative;
pub mod minimalist;
pub mod modern;
mod sections;

use serde::Serialize;
use thiserror::Error;

use crate::layout::fragment::{Fragment, A4_HEIGHT_PX};
use crate::models::ResumeData;

pub use accent::{list_accents, resolve_accent, AccentColor};

// ────────────────────────────────────────────────────────────────────────────
// Shared vocabulary
// ────────────────────────────────────────────────────────────────────────────

pub const LABEL_SUMMARY: &str = "Resumo";
pub const LABEL_EXPERIENCE: &str = "Experiência";
pub const LABEL_EDUCATION: &str = "Formação";
pub const LABEL_SKILLS: &str = "Competências";
pub const LABEL_CONTACT: &str = "Contacto";

/// Tailwind colours the templates were designed with.
pub mod palette {
    pub const WHITE: &str = "#FFFFFF";
    pub const WHITE_HALF: &str = "rgba(255,255,255,0.5)";
    pub const GRAY_200: &str = "#E5E7EB";
    pub const GRAY_600: &str = "#4B5563";
    pub const GRAY_700: &str = "#374151";
    pub const GRAY_800: &str = "#1F2937";
    pub const GRAY_900: &str = "#111827";
    pub const SLATE_50: &str = "#F8FAFC";
    pub const SLATE_300: &str = "#CBD5E1";
    pub const SLATE_500: &str = "#64748B";
    pub const SLATE_600: &str = "#475569";
    pub const SLATE_700: &str = "#334155";
    pub const SLATE_800: &str = "#1E293B";
}

/// "{company} | {start} - {end}", the meta line under each entry title.
pub fn entry_meta(organisation: &str, start: &str, end: &str) -> String {
    format!("{organisation} | {start} - {end}")
}

// ────────────────────────────────────────────────────────────────────────────
// Registry
// ────────────────────────────────────────────────────────────────────────────

/// Per-render inputs that are not résumé data.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext {
    /// Resolved accent hex.
    pub accent: String,
    pub export_mode: bool,
}

impl RenderContext {
    /// Final page height for content ending at `content_bottom`. Export mode fills at
    /// least one physical A4 page; overflow simply grows the page.
    pub fn page_height(&self, content_bottom: f32) -> f32 {
        if self.export_mode {
            content_bottom.max(A4_HEIGHT_PX)
        } else {
            content_bottom
        }
    }
}

pub type RenderFn = fn(&ResumeData, &RenderContext) -> Fragment;

pub struct TemplateDescriptor {
    pub id: &'static str,
    pub display_name: &'static str,
    pub preview_image: &'static str,
    pub default_accent: &'static str,
    pub render: RenderFn,
}

impl TemplateDescriptor {
    /// Renders with `accent_id` resolved against this template's default.
    pub fn render_with(&self, data: &ResumeData, accent_id: Option<&str>, export_mode: bool) -> Fragment {
        let ctx = RenderContext {
            accent: resolve_accent(accent_id, self.default_accent).to_string(),
            export_mode,
        };
        (self.render)(data, &ctx)
    }

    pub fn summary(&self) -> TemplateSummary {
        TemplateSummary {
            id: self.id,
            name: self.display_name,
            preview_image: self.preview_image,
        }
    }
}

impl std::fmt::Debug for TemplateDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateDescriptor")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .finish()
    }
}

/// Wire form of a descriptor for the selection UI.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSummary {
    pub id: &'static str,
    pub name: &'static str,
    pub preview_image: &'static str,
}

static TEMPLATES: &[TemplateDescriptor] = &[
    TemplateDescriptor {
        id: "classic",
        display_name: "Clássico",
        preview_image: "/images/templates/classic.png",
        default_accent: "#2563EB",
        render: classic::render,
    },
    TemplateDescriptor {
        id: "creative",
        display_name: "Criativo",
        preview_image: "/images/templates/creative.png",
        default_accent: "#06B6D4",
        render: creative::render,
    },
    TemplateDescriptor {
        id: "minimalist",
        display_name: "Minimalista",
        preview_image: "/images/templates/minimalist.png",
        default_accent: "#475569",
        render: minimalist::render,
    },
    TemplateDescriptor {
        id: "modern",
        display_name: "Moderno",
        preview_image: "/images/templates/modern.png",
        default_accent: "#4F46E5",
        render: modern::render,
    },
];

pub fn list_templates() -> &'static [TemplateDescriptor] {
    TEMPLATES
}

pub fn find_template(id: &str) -> Option<&'static TemplateDescriptor> {
    TEMPLATES.iter().find(|t| t.id == id)
}

/// The template preselected for a new session, or `None` when nothing is
/// registered ("no template selected").
pub fn default_template_id() -> Option<&'static str> {
    first_template_id(list_templates())
}

fn first_template_id(templates: &'static [TemplateDescriptor]) -> Option<&'static str> {
    templates.first().map(|t| t.id)
}

#[derive(Debug, Error, PartialEq)]
pub enum RenderError {
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),
}

/// Renders `data` with the named template.
///
/// Unknown accent ids never fail; an unknown template id does.
pub fn render(
    data: &ResumeData,
    template_id: &str,
    accent_id: Option<&str>,
    export_mode: bool,
) -> Result<Fragment, RenderError> {
    let descriptor =
        find_template(template_id).ok_or_else(|| RenderError::UnknownTemplate(template_id.to_string()))?;
    Ok(descriptor.render_with(data, accent_id, export_mode))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::resume::{EducationEntry, ExperienceEntry, PersonalInfo, SkillEntry};

    /// A résumé exercising every section, including entries that must be filtered out.
    pub(crate) fn full_resume() -> ResumeData {
        ResumeData {
            personal_info: PersonalInfo {
                full_name: "Ana Silva".to_string(),
                job_title: "Engenheira de Software".to_string(),
                email: "ana.silva@example.com".to_string(),
                phone: "+351 912 345 678".to_string(),
                linkedin: "linkedin.com/in/anasilva".to_string(),
                address: "Lisboa, Portugal".to_string(),
                photo: String::new(),
            },
            summary: "Engenheira com experiência em sistemas distribuídos e produtos web.".to_string(),
            experience: vec![
                ExperienceEntry {
                    id: 1,
                    company: "Acme".to_string(),
                    role: "Dev".to_string(),
                    start_date: "2020-01".to_string(),
                    end_date: String::new(),
                    description: "Built things".to_string(),
                },
                ExperienceEntry {
                    id: 2,
                    company: "Ghost Corp".to_string(),
                    role: String::new(),
                    start_date: "2018-01".to_string(),
                    end_date: "2019-12".to_string(),
                    description: "Should never render".to_string(),
                },
                ExperienceEntry {
                    id: 3,
                    company: String::new(),
                    role: "Phantom Role".to_string(),
                    ..Default::default()
                },
            ],
            education: vec![
                EducationEntry {
                    id: 4,
                    institution: "Universidade de Lisboa".to_string(),
                    degree: "Mestrado em Informática".to_string(),
                    start_date: "2015".to_string(),
                    end_date: "2017".to_string(),
                },
                EducationEntry {
                    id: 5,
                    institution: "Orphan Institute".to_string(),
                    degree: String::new(),
                    ..Default::default()
                },
            ],
            skills: vec![
                SkillEntry { id: 6, name: "Go".to_string() },
                SkillEntry { id: 7, name: String::new() },
                SkillEntry { id: 8, name: "Rust".to_string() },
            ],
        }
    }

    pub(crate) fn with_photo(mut data: ResumeData) -> ResumeData {
        data.personal_info.photo = "data:image/png;base64,iVBORw0KGgo=".to_string();
        data
    }

    #[test]
    fn test_registry_order_is_stable() {
        let ids: Vec<&str> = list_templates().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["classic", "creative", "minimalist", "modern"]);
        let again: Vec<&str> = list_templates().iter().map(|t| t.id).collect();
        assert_eq!(ids, again);
    }

    #[test]
    fn test_default_template_is_first() {
        assert_eq!(default_template_id(), Some("classic"));
    }

    #[test]
    fn test_empty_registry_fails_closed() {
        static NONE: &[TemplateDescriptor] = &[];
        assert_eq!(first_template_id(NONE), None);
    }

    #[test]
    fn test_unknown_template_is_an_error() {
        let err = render(&ResumeData::default(), "baroque", None, false).unwrap_err();
        assert_eq!(err, RenderError::UnknownTemplate("baroque".to_string()));
    }

    #[test]
    fn test_unfilled_experience_excluded_from_every_template() {
        let data = full_resume();
        for t in list_templates() {
            for export_mode in [false, true] {
                let fragment = t.render_with(&data, None, export_mode);
                assert!(fragment.contains_text("Acme"), "{} should render filled entry", t.id);
                assert!(!fragment.contains_text("Ghost Corp"), "{} rendered entry without role", t.id);
                assert!(!fragment.contains_text("Phantom Role"), "{} rendered entry without company", t.id);
                assert!(!fragment.contains_text("Should never render"), "{}", t.id);
                assert!(!fragment.contains_text("Orphan Institute"), "{}", t.id);
            }
        }
    }

    #[test]
    fn test_export_mode_preserves_text_content() {
        for data in [full_resume(), with_photo(full_resume()), ResumeData::default()] {
            for t in list_templates() {
                let screen = t.render_with(&data, Some("green"), false);
                let export = t.render_with(&data, Some("green"), true);
                assert_eq!(screen.text_content(), export.text_content(), "content drift in {}", t.id);
                assert_eq!(screen.has_photo(), export.has_photo());
            }
        }
    }

    #[test]
    fn test_export_mode_fills_at_least_one_page() {
        for t in list_templates() {
            let export = t.render_with(&ResumeData::default(), None, true);
            assert!(export.height >= A4_HEIGHT_PX, "{} export page too short", t.id);
            assert!(export.export_mode);
            let screen = t.render_with(&ResumeData::default(), None, false);
            assert!(screen.height <= export.height);
        }
    }

    #[test]
    fn test_long_content_overflows_past_one_page() {
        let mut data = full_resume();
        let template = data.experience[0].clone();
        data.experience = (0..40)
            .map(|i| ExperienceEntry { id: 100 + i, ..template.clone() })
            .collect();
        for t in list_templates() {
            let export = t.render_with(&data, None, true);
            assert!(export.height > A4_HEIGHT_PX, "{} did not grow with content", t.id);
        }
    }

    #[test]
    fn test_accent_round_trips_through_fragment() {
        for t in list_templates() {
            for color in list_accents() {
                let fragment = t.render_with(&full_resume(), Some(color.id), false);
                assert_eq!(fragment.accent, color.hex);
            }
            let fallback = t.render_with(&full_resume(), Some("not-a-colour"), false);
            assert_eq!(fallback.accent, t.default_accent);
        }
    }

    #[test]
    fn test_photo_presence_only_adds_photo_node() {
        for t in list_templates() {
            let without = t.render_with(&full_resume(), None, false);
            let with = t.render_with(&with_photo(full_resume()), None, false);
            assert!(!without.has_photo());
            assert!(with.has_photo(), "{} dropped the photo", t.id);
            assert_eq!(without.text_content(), with.text_content());
        }
    }

    #[test]
    fn test_empty_sections_have_no_headers() {
        let mut data = full_resume();
        data.education.clear();
        data.skills.retain(|s| s.name.is_empty());
        data.summary.clear();
        for t in list_templates() {
            let fragment = t.render_with(&data, None, false);
            assert!(!fragment.contains_text(LABEL_EDUCATION), "{}", t.id);
            assert!(!fragment.contains_text(LABEL_SKILLS), "{}", t.id);
            assert!(!fragment.contains_text(LABEL_SUMMARY), "{}", t.id);
            assert!(fragment.contains_text(LABEL_EXPERIENCE), "{}", t.id);
        }
    }

    #[test]
    fn test_minimalist_scenario() {
        let data: ResumeData = serde_json::from_str(
            r#"{
                "personalInfo": {"fullName": "Ana Silva"},
                "experience": [{"id": 1, "company": "Acme", "role": "Dev", "startDate": "2020-01",
                                "endDate": "", "description": "Built things"}],
                "education": [],
                "skills": [{"id": 2, "name": "Go"}]
            }"#,
        )
        .unwrap();
        let fragment = render(&data, "minimalist", Some("slate"), false).unwrap();
        for needle in ["Ana Silva", "Acme", "Dev", "Atual", "Go"] {
            assert!(fragment.contains_text(needle), "missing {needle}: {}", fragment.text_content());
        }
        assert!(!fragment.contains_text(LABEL_EDUCATION));
        assert_eq!(fragment.accent, "#475569");
    }

    #[test]
    fn test_blocks_lie_within_page() {
        for t in list_templates() {
            let fragment = t.render_with(&full_resume(), None, true);
            assert!(!fragment.blocks.is_empty(), "{} declared no blocks", t.id);
            for b in &fragment.blocks {
                assert!(b.top >= 0.0 && b.bottom <= fragment.height && b.top < b.bottom);
            }
        }
    }
}
