//! Splitting rendered prompts back into sections.

use std::collections::BTreeMap;

/// Sections every rendered prompt must contain, non-empty.
pub const REQUIRED_SECTIONS: &[&str] = &[
    "Opening Statement",
    "Main Character",
    "Setting",
    "Atmosphere & Mood",
    "Authenticity",
    "Core Action & Dialogue",
    "Camera Style",
    "Landscape",
];

/// Splits rendered Markdown on `## ` headings.
///
/// Returns heading → trimmed body. Text before the first heading is ignored.
///
/// # Examples
///
/// ```
/// use veoprompt_template::parse_sections;
///
/// let sections = parse_sections("## Sounds\n- crunching snow\n- wind\n\n## Props\n- thermos\n");
/// assert_eq!(sections["Sounds"], "- crunching snow\n- wind");
/// assert_eq!(sections["Props"], "- thermos");
/// ```
pub fn parse_sections(text: &str) -> BTreeMap<String, String> {
    let mut sections = BTreeMap::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for line in text.lines() {
        if let Some(heading) = line.strip_prefix("## ") {
            if let Some((title, body)) = current.take() {
                sections.insert(title, body.join("\n").trim().to_string());
            }
            current = Some((heading.trim().to_string(), Vec::new()));
        } else if let Some((_, body)) = current.as_mut() {
            body.push(line);
        }
    }
    if let Some((title, body)) = current {
        sections.insert(title, body.join("\n").trim().to_string());
    }
    sections
}
