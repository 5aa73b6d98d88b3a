//! Turning model replies into filename candidates

use serde::Deserialize;

use crate::error::{Error, Result};

/// OpenAI-compatible chat completion response (only the fields we read)
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FilenameReply {
    filenames: Vec<String>,
}

/// Extract the reply text from a raw response body
pub fn reply_text(body: &str) -> Result<String> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| Error::Parse(format!("response is not a chat completion: {}", e)))?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| Error::Parse("response has no message content".into()))
}

/// Parse a reply into at most `max` unique, normalised candidates.
///
/// Accepts a `{"filenames": [...]}` object (possibly fenced or surrounded
/// by prose) or a plain list with one name per line.
pub fn parse_candidates(text: &str, max: usize) -> Result<Vec<String>> {
    let raw = match parse_json_reply(text)? {
        Some(names) => names,
        None => text
            .lines()
            .filter_map(strip_list_marker)
            .map(str::to_string)
            .collect(),
    };

    let mut candidates: Vec<String> = Vec::new();
    for name in raw.iter().map(|name| slugify(name)) {
        if name.is_empty() || candidates.contains(&name) {
            continue;
        }
        candidates.push(name);
        if candidates.len() == max {
            break;
        }
    }

    if candidates.is_empty() {
        return Err(Error::Parse(format!(
            "no usable filenames in reply {:?}",
            truncate(text, 120)
        )));
    }
    Ok(candidates)
}

/// Filenames from the outermost `{...}` of the reply, if there is one.
///
/// A reply that mentions `"filenames"` but does not decode is an error,
/// never material for the line parser.
fn parse_json_reply(text: &str) -> Result<Option<Vec<String>>> {
    let body = strip_code_fence(text);
    let object = match (body.find('{'), body.rfind('}')) {
        (Some(start), Some(end)) if start < end => &body[start..=end],
        _ => body,
    };
    match serde_json::from_str::<FilenameReply>(object) {
        Ok(reply) => Ok(Some(reply.filenames)),
        Err(e) if text.contains("\"filenames\"") => Err(Error::Parse(format!(
            "malformed filenames object: {}",
            e
        ))),
        Err(_) => Ok(None),
    }
}

/// Contents of the first Markdown code fence, or the trimmed text
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(start) = trimmed.find("```") else {
        return trimmed;
    };
    let after = &trimmed[start + 3..];
    // Skip the info string (`json`) up to the end of the line
    let after = match after.find('\n') {
        Some(newline) => &after[newline + 1..],
        None => after,
    };
    match after.find("```") {
        Some(end) => after[..end].trim(),
        None => after.trim(),
    }
}

/// Strip numbering, bullets and quoting from one reply line
fn strip_list_marker(line: &str) -> Option<&str> {
    let mut line = line.trim();
    // Lead-in prose such as "Here are some options:"
    if line.is_empty() || line.starts_with("```") || line.ends_with(':') {
        return None;
    }

    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        // Only "1. name" is a marker; "2.5d-render" is a name
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix(['.', ')', ':']) {
            if rest.is_empty() {
                return None;
            }
            if rest.starts_with(char::is_whitespace) {
                line = rest.trim_start();
            }
        }
    } else if let Some(rest) = line.strip_prefix(['-', '*', '•']) {
        line = rest.trim_start();
    }

    let line = line.trim_matches(|c: char| matches!(c, '"' | '\'' | '`' | ',' | '*'));
    (!line.is_empty()).then_some(line)
}

/// Normalise a proposed name into a lowercase, hyphenated file stem
pub fn slugify(name: &str) -> String {
    let mut stem = name.trim();
    for ext in [".webp", ".png", ".jpg", ".jpeg"] {
        if stem.len() > ext.len()
            && stem
                .get(stem.len() - ext.len()..)
                .is_some_and(|tail| tail.eq_ignore_ascii_case(ext))
        {
            stem = &stem[..stem.len() - ext.len()];
            break;
        }
    }

    let mut slug = String::with_capacity(stem.len());
    for c in stem.chars() {
        if c.is_alphanumeric() || c == '.' {
            slug.extend(c.to_lowercase());
        } else if matches!(c, '-' | '_' | '/' | '\\') || c.is_whitespace() {
            if !slug.ends_with('-') {
                slug.push('-');
            }
        }
    }
    slug.trim_matches(|c: char| c == '-' || c == '.').to_string()
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
