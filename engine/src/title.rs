//! FILENAME: engine/src/title.rs
//! PURPOSE: Column title and sheet name construction.
//! CONTEXT: Identifiers are split at character-type transitions (camel
//! humps, acronym runs, digit runs), joined with the workbook delimiter
//! and capitalized. Title paths are composed segment by segment during
//! flattening.

/// Character classes used when splitting identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Upper,
    Lower,
    Digit,
    Other,
}

impl CharClass {
    fn of(ch: char) -> Self {
        if ch.is_uppercase() {
            CharClass::Upper
        } else if ch.is_lowercase() {
            CharClass::Lower
        } else if ch.is_numeric() {
            CharClass::Digit
        } else {
            CharClass::Other
        }
    }
}

/// Splits an identifier into words at character-type boundaries.
///
/// A run of upper-case letters followed by a lower-case letter is treated
/// as an acronym followed by a new word: the last upper-case letter starts
/// the new word ("HTTPServer" -> ["HTTP", "Server"]).
fn split_words(identifier: &str) -> Vec<String> {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev_class: Option<CharClass> = None;

    for ch in identifier.chars() {
        let class = CharClass::of(ch);
        match prev_class {
            None => current.push(ch),
            Some(prev) if prev == class => current.push(ch),
            Some(CharClass::Upper) if class == CharClass::Lower => {
                // Camel hump: the upper-case char belongs to the new word.
                if let Some(hump) = current.pop() {
                    if !current.is_empty() {
                        words.push(std::mem::take(&mut current));
                    }
                    current.push(hump);
                }
                current.push(ch);
            }
            Some(_) => {
                words.push(std::mem::take(&mut current));
                current.push(ch);
            }
        }
        prev_class = Some(class);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Capitalizes the first character of `text`, leaving the rest untouched.
fn capitalize(text: String) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => text,
    }
}

/// Derives a human-readable title segment from a field identifier:
/// `auto_title("publicationDate", " ")` is `"Publication Date"`.
///
/// Words are joined with the workbook delimiter, so a root configured with
/// `"_"` produces `"Publication_Date"`.
pub fn auto_title(identifier: &str, delimiter: &str) -> String {
    capitalize(split_words(identifier).join(delimiter))
}

/// Appends `segment` to `existing` with `delimiter` between them. An empty
/// `existing` path yields just the segment, with no leading delimiter.
pub fn compose_path(existing: &str, delimiter: &str, segment: &str) -> String {
    if existing.is_empty() {
        segment.to_string()
    } else {
        format!("{existing}{delimiter}{segment}")
    }
}

/// Maximum sheet name length accepted by the xlsx format.
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Characters a sheet name may not contain.
const INVALID_SHEET_NAME_CHARS: [char; 7] = ['/', '\\', '?', '*', ':', '[', ']'];

/// Produces a sheet name the workbook format will accept: invalid
/// characters become spaces and the result is truncated to 31 characters.
pub fn safe_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .take(MAX_SHEET_NAME_LEN)
        .map(|ch| {
            if INVALID_SHEET_NAME_CHARS.contains(&ch) {
                ' '
            } else {
                ch
            }
        })
        .collect();
    if cleaned.is_empty() {
        "Sheet".to_string()
    } else {
        cleaned
    }
}
