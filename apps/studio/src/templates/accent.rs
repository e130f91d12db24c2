//! Accent colour resolver.
//!
//! A fixed, ordered palette the user picks from. Templates ask for a colour by id
//! and always get a hex back: an unknown or missing id resolves to the
//! template's own default.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccentColor {
    pub id: &'static str,
    pub hex: &'static str,
}

pub const ACCENT_COLORS: &[AccentColor] = &[
    AccentColor { id: "blue", hex: "#2563EB" },
    AccentColor { id: "green", hex: "#16A34A" },
    AccentColor { id: "indigo", hex: "#4F46E5" },
    AccentColor { id: "slate", hex: "#475569" },
    AccentColor { id: "red", hex: "#DC2626" },
];

pub fn list_accents() -> &'static [AccentColor] {
    ACCENT_COLORS
}

pub fn find_accent(id: &str) -> Option<&'static AccentColor> {
    ACCENT_COLORS.iter().find(|c| c.id == id)
}

/// The colour preselected for a new session.
pub fn default_accent_id() -> &'static str {
    ACCENT_COLORS[0].id
}

/// Resolves `id` to a hex value, falling back to `template_default`.
pub fn resolve_accent(id: Option<&str>, template_default: &'static str) -> &'static str {
    id.and_then(find_accent)
        .map(|c| c.hex)
        .unwrap_or(template_default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_declared_id_resolves_to_its_hex() {
        for color in list_accents() {
            assert_eq!(resolve_accent(Some(color.id), "#000000"), color.hex);
        }
    }

    #[test]
    fn test_unknown_or_missing_id_uses_template_default() {
        assert_eq!(resolve_accent(Some("magenta"), "#06B6D4"), "#06B6D4");
        assert_eq!(resolve_accent(Some(""), "#06B6D4"), "#06B6D4");
        assert_eq!(resolve_accent(None, "#4F46E5"), "#4F46E5");
    }

    #[test]
    fn test_palette_order_is_stable_and_ids_unique() {
        let ids: Vec<&str> = list_accents().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["blue", "green", "indigo", "slate", "red"]);
        assert_eq!(default_accent_id(), "blue");
    }
}
