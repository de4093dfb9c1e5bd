use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fmt::{Debug, Formatter};
use regex::Regex;

use crate::grid::Cell;

/// An identifier for a given word, based on its index in the Corpus's `words` field.
pub type WordId = usize;

/// A regular expression describing which words may go in (part of) a slot, built from the slot's
/// current cells. Patterns are compared and cached by their text alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    text: String,
}

impl Pattern {
    fn cell_text(cell: &Cell) -> String {
        match cell {
            Cell::Letter(letter) => regex::escape(&letter.to_string()),
            _ => ".".to_string(),
        }
    }

    /// A pattern matching words of exactly `cells.len()` characters that agree with every letter
    /// already present.
    pub fn exact(cells: &[Cell]) -> Pattern {
        let inner: String = cells.iter().map(Pattern::cell_text).collect();

        Pattern { text: format!("^{}$", inner) }
    }

    /// A pattern matching any word that could occupy some contiguous part of a slot with these
    /// cells. If no letters are known yet, anything from 1 to `cells.len()` characters long will
    /// do. Otherwise the span from the first to the last known letter must appear verbatim, with
    /// up to as many extra characters on either side as there are unknown cells outside the span.
    pub fn permissive(cells: &[Cell]) -> Pattern {
        let first_known = cells.iter().position(|cell| cell.letter().is_some());
        let last_known = cells.iter().rposition(|cell| cell.letter().is_some());

        let (first, last) = match (first_known, last_known) {
            (Some(first), Some(last)) => (first, last),
            _ => return Pattern { text: format!("^.{{1,{}}}$", cells.len()) },
        };

        let leading = first;
        let trailing = cells.len() - 1 - last;

        let mut text = "^".to_string();
        if leading > 0 {
            text.push_str(&format!(".{{0,{}}}", leading));
        }
        text.extend(cells[first..=last].iter().map(Pattern::cell_text));
        if trailing > 0 {
            text.push_str(&format!(".{{0,{}}}", trailing));
        }
        text.push('$');

        Pattern { text }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// The fixed pool of candidate words, plus a cache from pattern text to the ids of the words that
/// match it. A corpus belongs to a single solve; nothing here is shared between attempts.
pub struct Corpus {
    words: Vec<String>,
    matches_by_pattern: HashMap<String, Vec<WordId>>,
    regexes_by_pattern: HashMap<String, Regex>,
}

impl Debug for Corpus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Corpus")
            .field("words", &(["(", &self.words.len().to_string(), " entries)"].join("")))
            .field("cached_patterns", &self.matches_by_pattern.len())
            .finish()
    }
}

impl Corpus {
    /// Build a corpus from an ordered word list. Repeated words are dropped (keeping the first
    /// occurrence) so that a word's id identifies its text.
    pub fn new<I, S>(words: I) -> Corpus
        where
            I: IntoIterator<Item=S>,
            S: Into<String>,
    {
        let mut seen: HashSet<String> = HashSet::new();
        let words = words
            .into_iter()
            .map(Into::into)
            .filter(|word: &String| !word.is_empty() && seen.insert(word.clone()))
            .collect();

        Corpus {
            words,
            matches_by_pattern: HashMap::new(),
            regexes_by_pattern: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn word(&self, word_id: WordId) -> &str {
        &self.words[word_id]
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// How many distinct patterns have been evaluated against the full word list so far.
    pub fn cached_pattern_count(&self) -> usize {
        self.matches_by_pattern.len()
    }

    fn regex(&mut self, pattern: &Pattern) -> Result<&Regex, regex::Error> {
        if !self.regexes_by_pattern.contains_key(pattern.as_str()) {
            let regex = Regex::new(pattern.as_str())?;
            self.regexes_by_pattern.insert(pattern.as_str().to_string(), regex);
        }

        Ok(&self.regexes_by_pattern[pattern.as_str()])
    }

    /// Does the given word match the pattern?
    pub fn matches(&mut self, pattern: &Pattern, word: &str) -> Result<bool, regex::Error> {
        Ok(self.regex(pattern)?.is_match(word))
    }

    /// Return the ids of every word matching the pattern, in corpus order. The first call for a
    /// given pattern scans the whole word list; later calls are answered from the cache.
    pub fn filter(&mut self, pattern: &Pattern) -> Result<&[WordId], regex::Error> {
        if !self.matches_by_pattern.contains_key(pattern.as_str()) {
            let regex = Regex::new(pattern.as_str())?;
            let matches: Vec<WordId> = self.words.iter()
                .enumerate()
                .filter(|(_, word)| regex.is_match(word))
                .map(|(word_id, _)| word_id)
                .collect();

            self.matches_by_pattern.insert(pattern.as_str().to_string(), matches);
        }

        Ok(&self.matches_by_pattern[pattern.as_str()])
    }
}

#[cfg(test)]
mod tests {
    use crate::corpus::{Corpus, Pattern};
    use crate::grid::Cell;
    use crate::grid::Cell::{Empty, Letter};

    fn matching(corpus: &mut Corpus, pattern: &Pattern) -> Vec<String> {
        let ids = corpus.filter(pattern).unwrap().to_vec();
        ids.into_iter().map(|id| corpus.word(id).to_string()).collect()
    }

    #[test]
    fn test_exact_pattern() {
        let pattern = Pattern::exact(&[Letter('c'), Empty, Letter('t')]);
        assert_eq!(pattern.as_str(), "^c.t$");

        let mut corpus = Corpus::new(["cat", "cot", "cart", "at", "dog"]);
        assert_eq!(matching(&mut corpus, &pattern), vec!["cat", "cot"]);
        assert!(corpus.matches(&pattern, "cut").unwrap());
        assert!(!corpus.matches(&pattern, "cuts").unwrap());
    }

    #[test]
    fn test_permissive_pattern_for_empty_slot() {
        let pattern = Pattern::permissive(&[Empty, Empty, Empty]);
        assert_eq!(pattern.as_str(), "^.{1,3}$");

        let mut corpus = Corpus::new(["a", "an", "ant", "ants"]);
        assert_eq!(matching(&mut corpus, &pattern), vec!["a", "an", "ant"]);
    }

    #[test]
    fn test_permissive_pattern_with_leading_letter() {
        let pattern = Pattern::permissive(&[Letter('c'), Empty, Empty]);
        assert_eq!(pattern.as_str(), "^c.{0,2}$");

        let mut corpus = Corpus::new(["cat", "dog", "ca", "c", "scat", "cats"]);
        assert_eq!(matching(&mut corpus, &pattern), vec!["cat", "ca", "c"]);
    }

    #[test]
    fn test_permissive_pattern_with_slack_on_both_sides() {
        let cells = [Empty, Letter('a'), Empty, Letter('e'), Empty, Empty];
        let pattern = Pattern::permissive(&cells);
        assert_eq!(pattern.as_str(), "^.{0,1}a.e.{0,2}$");

        let mut corpus = Corpus::new(["ate", "game", "gates", "agree", "games!", "gametes"]);
        assert_eq!(matching(&mut corpus, &pattern), vec!["ate", "game", "gates", "games!"]);
    }

    #[test]
    fn test_permissive_pattern_for_full_slot() {
        let pattern = Pattern::permissive(&[Letter('o'), Letter('x')]);
        assert_eq!(pattern.as_str(), "^ox$");
    }

    #[test]
    fn test_letters_are_escaped() {
        let pattern = Pattern::exact(&[Letter('.'), Empty]);
        assert_eq!(pattern.as_str(), "^\\..$");

        let mut corpus = Corpus::new(["ab", ".b"]);
        assert_eq!(matching(&mut corpus, &pattern), vec![".b"]);
    }

    #[test]
    fn test_non_ascii_letters_count_as_one_cell() {
        let pattern = Pattern::permissive(&[Letter('ש'), Cell::Empty]);

        let mut corpus = Corpus::new(["של", "שלום", "ש"]);
        assert_eq!(matching(&mut corpus, &pattern), vec!["של", "ש"]);
    }

    #[test]
    fn test_filter_is_cached_and_stable() {
        let mut corpus = Corpus::new(["bb", "ab", "ba", "aa", "ab"]);
        assert_eq!(corpus.len(), 4, "duplicates are dropped");

        let pattern = Pattern::permissive(&[Empty, Letter('b')]);
        let first = matching(&mut corpus, &pattern);
        assert_eq!(corpus.cached_pattern_count(), 1);

        let second = matching(&mut corpus, &pattern);
        assert_eq!(corpus.cached_pattern_count(), 1);

        assert_eq!(first, vec!["bb", "ab"]);
        assert_eq!(first, second);
    }
}
