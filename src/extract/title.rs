//! Heuristic title extraction from free-form event text.
//!
//! A lightweight stand-in for a part-of-speech tagger: tokens are
//! classified against small verb/stopword/temporal lexicons and the
//! title is chosen by a priority chain that always produces something.

const MAX_TITLE_CHARS: usize = 50;
const TRUNCATED_HEAD_CHARS: usize = 47;
const ELLIPSIS: &str = "...";

/// Verbs that open an action phrase ("schedule meeting", "call John").
const ACTION_VERBS: &[&str] = &[
    "attend", "book", "call", "catch", "celebrate", "discuss", "drop", "finish", "grab", "host",
    "interview", "join", "launch", "meet", "organize", "pick", "plan", "prepare", "present",
    "review", "schedule", "submit", "sync", "visit", "watch",
];

/// Function words that are never part of a title on their own.
const STOPWORDS: &[&str] = &[
    "a", "about", "after", "all", "an", "and", "any", "are", "at", "be", "been", "before", "but",
    "by", "can", "could", "did", "do", "does", "due", "every", "for", "from", "he", "her", "his",
    "i", "in", "is", "it", "its", "last", "let", "lets", "may", "me", "might", "must", "my",
    "need", "next", "of", "on", "or", "our", "please", "shall", "she", "should", "some", "that",
    "the", "their", "them", "these", "they", "this", "those", "to", "until", "us", "was", "we",
    "were", "will", "with", "without", "would", "you", "your",
];

/// Calendar vocabulary that belongs to the date/time, not the title.
const TEMPORAL_WORDS: &[&str] = &[
    "afternoon", "am", "annually", "april", "aug", "august", "daily", "day", "days", "dec",
    "december", "evening", "feb", "february", "friday", "jan", "january", "jul", "july", "jun",
    "june", "mar", "march", "may", "midday", "midnight", "monday", "month", "monthly", "months",
    "morning", "night", "noon", "nov", "november", "oct", "october", "pm", "saturday", "sep",
    "sept", "september", "sunday", "thursday", "today", "tomorrow", "tonight", "tuesday", "week",
    "weekly", "weeks", "wednesday", "year", "yearly", "years", "yesterday",
];

/// Extractor for a short human-readable event label.
#[derive(Debug, Default)]
pub struct TitleExtractor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenClass {
    Verb,
    Noun,
    Other,
}

/// One whitespace-delimited token of the input.
struct Token<'a> {
    /// Token with surrounding punctuation stripped.
    word: &'a str,
    /// Whether the raw token ended with a comma.
    trailing_comma: bool,
    class: TokenClass,
}

impl TitleExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract a title from the text. Never fails.
    ///
    /// Priority chain, first non-empty result wins:
    /// 1. action phrase (verb run followed by a noun run),
    /// 2. first multi-character noun fragment (comma-delimited),
    /// 3. first three words of the raw text,
    /// 4. the literal "New Event".
    pub fn extract(&self, text: &str) -> String {
        let tokens = tokenize(text);

        let title = action_phrase(&tokens)
            .or_else(|| noun_fragment(&tokens))
            .or_else(|| first_words(text))
            .unwrap_or_else(|| "New Event".to_string());

        truncate_title(&title)
    }
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    text.split_whitespace()
        .map(|raw| {
            let word = raw.trim_matches(|c: char| !c.is_alphanumeric());
            Token {
                word,
                trailing_comma: raw.ends_with(','),
                class: classify(word),
            }
        })
        .filter(|t| !t.word.is_empty())
        .collect()
}

fn classify(word: &str) -> TokenClass {
    let lower = word.to_lowercase();
    if word.chars().any(|c| c.is_ascii_digit()) || TEMPORAL_WORDS.contains(&lower.as_str()) {
        return TokenClass::Other;
    }
    if STOPWORDS.contains(&lower.as_str()) {
        return TokenClass::Other;
    }
    if ACTION_VERBS.contains(&lower.as_str()) {
        return TokenClass::Verb;
    }
    if word
        .chars()
        .all(|c| c.is_alphabetic() || c == '\'' || c == '-')
    {
        TokenClass::Noun
    } else {
        TokenClass::Other
    }
}

/// A run of verbs directly followed by a run of nouns.
fn action_phrase(tokens: &[Token<'_>]) -> Option<String> {
    let first_verb = tokens.iter().position(|t| t.class == TokenClass::Verb)?;

    let mut i = first_verb;
    while i < tokens.len() && tokens[i].class == TokenClass::Verb {
        i += 1;
    }
    let nouns_start = i;
    while i < tokens.len() && tokens[i].class == TokenClass::Noun {
        i += 1;
    }
    if i == nouns_start {
        return None;
    }

    let phrase = tokens[first_verb..i]
        .iter()
        .map(|t| t.word)
        .collect::<Vec<_>>()
        .join(" ");
    Some(phrase)
}

/// The first multi-character comma-delimited fragment of the
/// concatenated noun text, or the full noun text if no fragment
/// qualifies.
fn noun_fragment(tokens: &[Token<'_>]) -> Option<String> {
    let mut nouns = String::new();
    for token in tokens.iter().filter(|t| t.class == TokenClass::Noun) {
        if !nouns.is_empty() {
            nouns.push(' ');
        }
        nouns.push_str(token.word);
        if token.trailing_comma {
            nouns.push(',');
        }
    }
    if nouns.is_empty() {
        return None;
    }

    let fragment = nouns
        .split(',')
        .map(str::trim)
        .find(|f| f.chars().count() > 1)
        .unwrap_or(&nouns);
    Some(fragment.to_string())
}

/// First three whitespace-delimited words of the raw text.
fn first_words(text: &str) -> Option<String> {
    let words: Vec<&str> = text.split_whitespace().take(3).collect();
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

/// Trim and bound the title to 50 display characters.
fn truncate_title(title: &str) -> String {
    let trimmed = title.trim();
    if trimmed.chars().count() > MAX_TITLE_CHARS {
        let head: String = trimmed.chars().take(TRUNCATED_HEAD_CHARS).collect();
        format!("{head}{ELLIPSIS}")
    } else {
        trimmed.to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================
