//! Two-stage parser for provider responses.
//!
//! Stage one: strip code-fence markers and read a JSON object with
//! `subject`/`body` keys. Stage two (fallback): scan line-by-line for a
//! `Subject:` prefix; that line's remainder becomes the subject and the rest
//! of the text becomes the body. With neither structure present the whole
//! response is the body and the subject is left empty.

use super::GeneratedDraft;

pub fn parse_generated(text: &str) -> GeneratedDraft {
    let trimmed = text.trim();

    if let Some(draft) = parse_json(trimmed) {
        return draft;
    }
    heuristic_extract(trimmed)
}

/// Providers routinely wrap JSON in ``` or ```json fences despite being
/// asked for bare JSON.
fn strip_code_fences(text: &str) -> &str {
    let mut t = text.trim();
    if let Some(rest) = t.strip_prefix("```json") {
        t = rest;
    } else if let Some(rest) = t.strip_prefix("```") {
        t = rest;
    }
    if let Some(rest) = t.strip_suffix("```") {
        t = rest;
    }
    t.trim()
}

fn parse_json(text: &str) -> Option<GeneratedDraft> {
    let value: serde_json::Value = serde_json::from_str(strip_code_fences(text)).ok()?;
    let obj = value.as_object()?;
    Some(GeneratedDraft {
        subject: obj
            .get("subject")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string(),
        body: obj
            .get("body")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string(),
    })
}

fn heuristic_extract(text: &str) -> GeneratedDraft {
    for line in text.lines() {
        let lead = line.trim();
        let is_subject = lead
            .get(..8)
            .is_some_and(|p| p.eq_ignore_ascii_case("subject:"));
        if is_subject {
            let subject = lead[8..].trim().to_string();
            let body = text.replacen(line, "", 1).trim().to_string();
            return GeneratedDraft { subject, body };
        }
    }

    GeneratedDraft {
        subject: String::new(),
        body: text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_json_object() {
        let d = parse_generated(r#"{"subject": "Meeting", "body": "See you at 3."}"#);
        assert_eq!(d.subject, "Meeting");
        assert_eq!(d.body, "See you at 3.");
    }

    #[test]
    fn json_in_fenced_block() {
        let d = parse_generated(
            "```json\n{\"subject\": \"Standup\", \"body\": \"Moved to 10am.\"}\n```",
        );
        assert_eq!(d.subject, "Standup");
        assert_eq!(d.body, "Moved to 10am.");
    }

    #[test]
    fn plain_fence_without_language_tag() {
        let d = parse_generated("```\n{\"subject\": \"Hi\", \"body\": \"There\"}\n```");
        assert_eq!(d.subject, "Hi");
        assert_eq!(d.body, "There");
    }

    #[test]
    fn json_missing_keys_defaults_to_empty() {
        let d = parse_generated(r#"{"subject": "Only subject"}"#);
        assert_eq!(d.subject, "Only subject");
        assert_eq!(d.body, "");
    }

    #[test]
    fn subject_line_heuristic() {
        let d = parse_generated("Subject: Meeting\nLet's meet tomorrow.");
        assert_eq!(d.subject, "Meeting");
        assert_eq!(d.body, "Let's meet tomorrow.");
    }

    #[test]
    fn subject_line_is_case_insensitive() {
        let d = parse_generated("SUBJECT: Loud\nbody text");
        assert_eq!(d.subject, "Loud");
        assert_eq!(d.body, "body text");
    }

    #[test]
    fn subject_line_not_first() {
        let d = parse_generated("Dear team,\nSubject: Update\nAll good.");
        assert_eq!(d.subject, "Update");
        assert_eq!(d.body, "Dear team,\n\nAll good.");
    }

    #[test]
    fn no_structure_at_all() {
        let d = parse_generated("Just a plain reply with no markers.");
        assert_eq!(d.subject, "");
        assert_eq!(d.body, "Just a plain reply with no markers.");
    }

    #[test]
    fn non_object_json_falls_through_to_heuristic() {
        let d = parse_generated("[1, 2, 3]");
        assert_eq!(d.subject, "");
        assert_eq!(d.body, "[1, 2, 3]");
    }
}
