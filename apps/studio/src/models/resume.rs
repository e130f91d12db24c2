//! Résumé data model: the single aggregate the renderer reads.
//!
//! The session owns a `ResumeData` and hands out shared references; templates never
//! mutate it. "Filled" predicates live here so every template filters the same way.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Stable identity of a list entry. Used for in-place updates, reordering and removal.
pub type EntryId = u64;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub job_title: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
    pub address: String,
    /// Data-URI of the cropped profile photo, or empty.
    pub photo: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceEntry {
    pub id: EntryId,
    pub company: String,
    pub role: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    pub id: EntryId,
    pub institution: String,
    pub degree: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillEntry {
    pub id: EntryId,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeData {
    pub personal_info: PersonalInfo,
    pub summary: String,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<SkillEntry>,
}

fn is_present(s: &str) -> bool {
    !s.trim().is_empty()
}

impl ExperienceEntry {
    pub fn is_filled(&self) -> bool {
        is_present(&self.company) && is_present(&self.role)
    }

    /// End date as displayed; an open-ended position reads "Atual".
    pub fn end_label(&self) -> &str {
        if is_present(&self.end_date) {
            &self.end_date
        } else {
            "Atual"
        }
    }
}

impl EducationEntry {
    pub fn is_filled(&self) -> bool {
        is_present(&self.institution) && is_present(&self.degree)
    }
}

impl SkillEntry {
    pub fn is_filled(&self) -> bool {
        is_present(&self.name)
    }
}

impl PersonalInfo {
    pub fn has_photo(&self) -> bool {
        is_present(&self.photo)
    }

    /// Contact fields in display order (email, phone, address, linkedin), skipping empty ones.
    pub fn contact_lines(&self) -> Vec<(ContactKind, &str)> {
        [
            (ContactKind::Email, self.email.as_str()),
            (ContactKind::Phone, self.phone.as_str()),
            (ContactKind::Address, self.address.as_str()),
            (ContactKind::Linkedin, self.linkedin.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| is_present(value))
        .collect()
    }
}

/// Which contact channel a line belongs to; templates pick an icon glyph from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    Email,
    Phone,
    Address,
    Linkedin,
}

impl ResumeData {
    pub fn filled_experience(&self) -> Vec<&ExperienceEntry> {
        self.experience.iter().filter(|e| e.is_filled()).collect()
    }

    pub fn filled_education(&self) -> Vec<&EducationEntry> {
        self.education.iter().filter(|e| e.is_filled()).collect()
    }

    pub fn filled_skills(&self) -> Vec<&SkillEntry> {
        self.skills.iter().filter(|s| s.is_filled()).collect()
    }

    pub fn has_summary(&self) -> bool {
        is_present(&self.summary)
    }

    /// Checks that ids are unique within each sequence.
    ///
    /// Returns the name of the first offending sequence and the duplicated id.
    pub fn duplicate_id(&self) -> Option<(&'static str, EntryId)> {
        first_duplicate(self.experience.iter().map(|e| e.id))
            .map(|id| ("experience", id))
            .or_else(|| first_duplicate(self.education.iter().map(|e| e.id)).map(|id| ("education", id)))
            .or_else(|| first_duplicate(self.skills.iter().map(|s| s.id)).map(|id| ("skills", id)))
    }

    /// Applies a partial replacement. Present top-level fields replace the stored value
    /// wholesale; `personalInfo` is merged field by field.
    pub fn apply_patch(&mut self, patch: ResumePatch) {
        if let Some(info) = patch.personal_info {
            let target = &mut self.personal_info;
            macro_rules! merge {
                ($($field:ident),*) => {
                    $(if let Some(v) = info.$field { target.$field = v; })*
                };
            }
            merge!(full_name, job_title, email, phone, linkedin, address, photo);
        }
        if let Some(summary) = patch.summary {
            self.summary = summary;
        }
        if let Some(experience) = patch.experience {
            self.experience = experience;
        }
        if let Some(education) = patch.education {
            self.education = education;
        }
        if let Some(skills) = patch.skills {
            self.skills = skills;
        }
    }
}

fn first_duplicate(ids: impl Iterator<Item = EntryId>) -> Option<EntryId> {
    let mut seen = HashSet::new();
    ids.into_iter().find(|id| !seen.insert(*id))
}

// ────────────────────────────────────────────────────────────────────────────
// Partial updates
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfoPatch {
    pub full_name: Option<String>,
    pub job_title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub address: Option<String>,
    pub photo: Option<String>,
}

/// Partial replacement of a `ResumeData`, as sent by the form on each edit.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumePatch {
    pub personal_info: Option<PersonalInfoPatch>,
    pub summary: Option<String>,
    pub experience: Option<Vec<ExperienceEntry>>,
    pub education: Option<Vec<EducationEntry>>,
    pub skills: Option<Vec<SkillEntry>>,
}
