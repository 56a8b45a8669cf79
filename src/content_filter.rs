/*!
 * Flag predicate for caption text.
 *
 * A `ContentFilter` is built from an explicit word configuration rather than
 * a global list: `(words, add_words, ignore_words) -> predicate`. Inline
 * markers recognised by the parser take precedence over pattern matching,
 * and the ignore marker wins over everything.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::errors::FilterError;
use crate::subtitle_processor::Caption;

/// Built-in word patterns. Entries are regex fragments matched as whole
/// words, case-insensitively.
pub const DEFAULT_WORDS: &[&str] = &[
    "arse",
    "ass",
    "asshole.*",
    "bitch.*",
    "bullshit",
    "blow.?job",
    "cock",
    "cocksucker.*",
    "cunt.*",
    "damn",
    "dick.?.?.?",
    "dickhead",
    "dildo",
    "dyke",
    "dumbass.*",
    "fuck.*",
    "god.?damn.*",
    "holy.?shit",
    "horseshit",
    "mother.?fuc.*",
    "nigg.*",
    "penis.*",
    "pussy",
    "shit.*",
    "smartass",
    "tits?",
    "titties",
    "twat",
];

// Compiled once; the built-in list is static and known to compile
static DEFAULT_FILTER: Lazy<ContentFilter> = Lazy::new(|| match ContentFilter::new(DEFAULT_WORDS, &[], &[]) {
    Ok(filter) => filter,
    Err(e) => unreachable!("built-in word list failed to compile: {}", e),
});

/// Decides whether a caption must be cut
pub trait FlagPredicate {
    fn is_flagged(&self, caption: &Caption) -> bool;
}

impl<F> FlagPredicate for F
where
    F: Fn(&Caption) -> bool,
{
    fn is_flagged(&self, caption: &Caption) -> bool {
        self(caption)
    }
}

/// Word-list based flag predicate
#[derive(Debug, Clone)]
pub struct ContentFilter {
    pattern: Option<Regex>,
    ignore: Option<Regex>,
}

impl ContentFilter {
    /// Build a filter from the base word list, extra words and ignored words.
    ///
    /// `words` and `add_words` are regex fragments; `ignore_words` are literal
    /// words masked out of the text before matching.
    pub fn new<S: AsRef<str>>(words: &[S], add_words: &[S], ignore_words: &[S]) -> Result<Self, FilterError> {
        let mut fragments = Vec::new();
        for word in words.iter().chain(add_words.iter()) {
            let word = word.as_ref().trim();
            if word.is_empty() {
                continue;
            }
            // Compile each fragment alone so the error names the bad entry
            Regex::new(word).map_err(|e| FilterError::InvalidPattern {
                pattern: word.to_string(),
                reason: e.to_string(),
            })?;
            fragments.push(word.to_string());
        }

        let ignored: Vec<String> = ignore_words
            .iter()
            .map(|w| w.as_ref().trim())
            .filter(|w| !w.is_empty())
            .map(regex::escape)
            .collect();

        debug!(
            "Content filter built with {} pattern(s) and {} ignored word(s)",
            fragments.len(),
            ignored.len()
        );

        Ok(Self {
            pattern: whole_word_regex(&fragments)?,
            ignore: whole_word_regex(&ignored)?,
        })
    }

    /// Filter using the built-in word list
    pub fn with_defaults() -> Self {
        DEFAULT_FILTER.clone()
    }

    /// Whether the text matches the word list, after masking ignored words
    pub fn matches_text(&self, text: &str) -> bool {
        let Some(pattern) = &self.pattern else {
            return false;
        };

        match &self.ignore {
            Some(ignore) => pattern.is_match(&ignore.replace_all(text, " ")),
            None => pattern.is_match(text),
        }
    }
}

impl FlagPredicate for ContentFilter {
    fn is_flagged(&self, caption: &Caption) -> bool {
        if caption.annotations.force_ignore {
            return false;
        }
        caption.annotations.force_remove || self.matches_text(&caption.text)
    }
}

fn whole_word_regex(fragments: &[String]) -> Result<Option<Regex>, FilterError> {
    if fragments.is_empty() {
        return Ok(None);
    }

    let joined = fragments.join("|");
    RegexBuilder::new(&format!(r"\b(?:{})\b", joined))
        .case_insensitive(true)
        .build()
        .map(Some)
        .map_err(|e| FilterError::InvalidPattern {
            pattern: joined,
            reason: e.to_string(),
        })
}
