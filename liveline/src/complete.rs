//! Tab completion

use alloc::{borrow::ToOwned, format, string::String, vec::Vec};

use crate::line_buffer::LineBuffer;

/// Default number of candidates listed at once
pub const DEFAULT_MAX_SUGGESTIONS: usize = 8;

/// A type that provides possible completions for the word under the
/// cursor
///
/// `start` and `end` are the code point offsets of `word` in the
/// line. Returning `None` leaves the line alone, while an empty list
/// rings the bell.
///
/// ```
/// use liveline::complete::Completer;
///
/// static FRUIT_LIST: [&str; 6] = ["Apple", "Banana", "Lemon", "Lime", "Peach", "Pear"];
///
/// struct Fruit;
///
/// impl Completer for Fruit {
///     fn complete(&mut self, word: &str, _start: usize, _end: usize) -> Option<Vec<String>> {
///         Some(
///             FRUIT_LIST
///                 .iter()
///                 .filter(|candidate| candidate.starts_with(word))
///                 .map(|candidate| candidate.to_string())
///                 .collect(),
///         )
///     }
/// }
///
/// assert_eq!(Fruit.complete("Pe", 0, 2), Some(vec!["Peach".into(), "Pear".into()]))
/// ```
///
/// Closures with a matching signature are completers too.
pub trait Completer {
    fn complete(&mut self, word: &str, start: usize, end: usize) -> Option<Vec<String>>;
}

impl<F> Completer for F
where
    F: FnMut(&str, usize, usize) -> Option<Vec<String>>,
{
    fn complete(&mut self, word: &str, start: usize, end: usize) -> Option<Vec<String>> {
        self(word, start, end)
    }
}

/// Completes from a fixed list of words
pub struct WordCompleter {
    words: Vec<String>,
}

impl WordCompleter {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }
}

impl Completer for WordCompleter {
    fn complete(&mut self, _word: &str, _start: usize, _end: usize) -> Option<Vec<String>> {
        Some(self.words.clone())
    }
}

#[cfg_attr(test, derive(Debug, PartialEq, Eq))]
pub(crate) enum Completion {
    /// Completer declined
    Ignore,
    /// Nothing matches
    NoMatch,
    /// New line content and cursor position
    Replace { input: String, cursor: usize },
    /// Candidates to print below the prompt
    List(String),
}

/// Start of the word ending at the end of `before`, as a byte offset.
/// Spaces preceded by a backslash belong to the word.
fn word_start(before: &str) -> usize {
    let mut start = 0;
    let mut escaped = false;

    for (pos, c) in before.char_indices() {
        if c == ' ' && !escaped {
            start = pos + 1;
        }

        escaped = c == '\\' && !escaped;
    }

    start
}

/// Longest prefix shared by all `candidates`, found by trimming the
/// first one from the end
fn common_prefix(candidates: &[String]) -> String {
    let mut prefix = candidates.first().cloned().unwrap_or_default();

    while !prefix.is_empty() && !candidates.iter().all(|c| c.starts_with(prefix.as_str())) {
        prefix.pop();
    }

    prefix
}

/// Whether `postfix` already closes `quote` before the next word
fn closes_quote(postfix: &str, quote: char) -> bool {
    match (postfix.find(quote), postfix.find(' ')) {
        (Some(q), Some(space)) => q < space,
        (Some(q), None) => q == 0,
        (None, _) => false,
    }
}

fn candidate_list(candidates: &[String], max: usize) -> String {
    let mut shown = candidates.to_vec();

    if shown.len() > max {
        let keep = max.saturating_sub(1);
        let others = shown.len() - keep;

        shown.truncate(keep);
        shown.push(format!("(+{} others)", others));
    }

    format!("\n{}\n", shown.join("  "))
}

pub(crate) fn complete(
    completer: &mut dyn Completer,
    buffer: &LineBuffer,
    cursor: usize,
    max_suggestions: usize,
) -> Completion {
    let (before, postfix) = buffer.split_at_char(cursor);
    let split = word_start(before);
    let (mut prefix, mut word) = (before[..split].to_owned(), &before[split..]);
    let mut start = prefix.chars().count();

    let quote = word.chars().next().filter(|&c| c == '"' || c == '\'');

    if let Some(quote) = quote {
        prefix.push(quote);
        word = &word[quote.len_utf8()..];
        start += 1;
    }

    let Some(mut candidates) = completer.complete(word, start, cursor) else {
        return Completion::Ignore;
    };

    candidates.sort();
    candidates.dedup();

    if !word.is_empty() {
        candidates.retain(|c| c.starts_with(word));
    }

    let mut found = match candidates.len() {
        0 => return Completion::NoMatch,
        1 => candidates[0].clone(),
        _ => {
            let common = common_prefix(&candidates);

            if common.is_empty() || common == word {
                return Completion::List(candidate_list(&candidates, max_suggestions));
            }

            common
        }
    };

    let single = candidates.len() == 1;

    match quote {
        Some(quote) if single && !closes_quote(postfix, quote) => found.push(quote),
        _ if found.is_empty() => found.push_str("''"),
        _ => (),
    }

    if single && postfix.is_empty() {
        found.push(' ');
    }

    let cursor = start + found.chars().count();

    Completion::Replace {
        input: [prefix.as_str(), found.as_str(), postfix].concat(),
        cursor,
    }
}
