//! Loading and querying the word list every game is played from.

use std::{collections::BTreeSet, fs, ops::Deref, path::Path};

use log::{debug, info};

use crate::{strategy::Word, ConfigError, Result};

/// An immutable, sorted and deduplicated set of five letter words.
///
/// A dictionary is built once before any game starts and then shared
/// read-only, usually behind an [`Arc`](std::sync::Arc), by every puzzle and
/// strategy instance.
///
/// # Examples
///
/// ```rust
/// use wordle_bench::Dictionary;
///
/// let dictionary = Dictionary::from_words(["Crane", " slate ", "crane", "toolong", "ab"]);
/// assert_eq!(dictionary.len(), 2);
/// assert_eq!(&*dictionary[0], "crane");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Dictionary {
    words: Vec<Word>,
}

impl Dictionary {
    /// Builds a dictionary from a list of words.
    ///
    /// Each entry is trimmed and lowercased. Entries that are not then five
    /// ascii letters are skipped and duplicates are removed.
    pub fn from_words<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
        let words: BTreeSet<Word> = words
            .into_iter()
            .filter_map(|line| Word::from_str(&line.trim().to_lowercase()).ok())
            .collect();

        Dictionary {
            words: words.into_iter().collect(),
        }
    }

    /// Builds a dictionary from newline separated text.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(data: &str) -> Self {
        Self::from_words(data.lines())
    }

    /// Reads a word list file with one word per line.
    ///
    /// Fails if the file cannot be read, or if it holds no usable words.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| ConfigError::WordList {
            path: path.to_path_buf(),
            source,
        })?;

        let dictionary = Self::from_str(&data);
        debug!(
            "{} of {} lines in {} were usable words",
            dictionary.len(),
            data.lines().count(),
            path.display()
        );

        if dictionary.is_empty() {
            return Err(ConfigError::EmptyWordList(path.to_path_buf()).into());
        }

        info!("loaded {} words from {}", dictionary.len(), path.display());
        Ok(dictionary)
    }

    /// Returns true if `word` is in the dictionary.
    pub fn contains(&self, word: &Word) -> bool {
        self.words.binary_search(word).is_ok()
    }

    /// Looks up a string, failing if it is not a word in this dictionary.
    pub fn word(&self, word: &str) -> Result<Word> {
        let word = Word::from_str(word)?;
        if self.contains(&word) {
            Ok(word)
        } else {
            Err(crate::PuzzleError::NotInWordlist(word.to_string()).into())
        }
    }
}

impl Deref for Dictionary {
    type Target = [Word];

    fn deref(&self) -> &Self::Target {
        &self.words
    }
}
