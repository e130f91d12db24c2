/// Fallback stem when the résumé has no name.
pub const DEFAULT_STEM: &str = "curriculo";

const SUFFIX: &str = "_CV.pdf";

/// Common filesystem limit on one path component, in bytes.
const MAX_NAME_BYTES: usize = 255;

/// `{full name, whitespace runs as "_"}_CV.pdf`, or `curriculo_CV.pdf` when
/// the name is blank.
pub fn export_filename(full_name: &str) -> String {
    let stem = sanitize_stem(&full_name.split_whitespace().collect::<Vec<_>>().join("_"));
    let stem = if stem.is_empty() { DEFAULT_STEM.to_string() } else { stem };
    format!("{stem}{SUFFIX}")
}

/// Replaces characters that are invalid in a filename on Windows, macOS or
/// Linux, and trims dots so the name cannot become hidden or relative.
fn sanitize_stem(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = replaced.trim_matches('.');

    let budget = MAX_NAME_BYTES - SUFFIX.len();
    let mut stem = String::new();
    for c in trimmed.chars() {
        if stem.len() + c.len_utf8() > budget {
            break;
        }
        stem.push(c);
    }
    stem
}
