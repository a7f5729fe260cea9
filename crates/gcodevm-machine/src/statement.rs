//! Statement accessor contract and a word-list statement
//!
//! Lexing raw G-code happens upstream. The machine only needs to look up
//! letter/value pairs, which is what [`WordSource`] describes.

use gcodevm_core::MachineError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lookup of letter/value words in one statement
///
/// Letters are matched case-insensitively through their upper-case form.
pub trait WordSource {
    /// Value of the first word with this letter
    fn word(&self, letter: char) -> Option<f64>;

    /// Values of every word with this letter, in statement order
    fn words(&self, letter: char) -> Vec<f64>;

    /// Value of the first word with this letter, or a missing word error
    fn get(&self, letter: char) -> Result<f64, MachineError> {
        self.word(letter)
            .ok_or(MachineError::MissingWord { letter })
    }

    /// Value of the first word with this letter, or `default`
    fn get_or(&self, letter: char, default: f64) -> f64 {
        self.word(letter).unwrap_or(default)
    }

    /// Check if the statement holds a word with this letter
    fn has(&self, letter: char) -> bool {
        self.word(letter).is_some()
    }
}

impl<T: WordSource + ?Sized> WordSource for &T {
    fn word(&self, letter: char) -> Option<f64> {
        (**self).word(letter)
    }

    fn words(&self, letter: char) -> Vec<f64> {
        (**self).words(letter)
    }
}

/// A single letter/value pair, e.g. `X10.5`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(char, f64)", into = "(char, f64)")]
pub struct Word {
    /// Upper-case word letter
    pub letter: char,
    /// Word value
    pub value: f64,
}

impl Word {
    /// Create a word, normalizing the letter to upper case
    pub fn new(letter: char, value: f64) -> Self {
        Self {
            letter: letter.to_ascii_uppercase(),
            value,
        }
    }
}

impl From<(char, f64)> for Word {
    fn from((letter, value): (char, f64)) -> Self {
        Self::new(letter, value)
    }
}

impl From<Word> for (char, f64) {
    fn from(word: Word) -> Self {
        (word.letter, word.value)
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter, self.value)
    }
}

/// An ordered list of words making up one block
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Statement {
    words: Vec<Word>,
}

impl Statement {
    /// Create an empty statement
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a statement from letter/value pairs
    pub fn from_words<I>(words: I) -> Self
    where
        I: IntoIterator<Item = (char, f64)>,
    {
        words.into_iter().collect()
    }

    /// Append a word
    pub fn push(&mut self, letter: char, value: f64) -> &mut Self {
        self.words.push(Word::new(letter, value));
        self
    }

    /// Words in statement order
    pub fn iter(&self) -> impl Iterator<Item = &Word> {
        self.words.iter()
    }

    /// Number of words
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check if the statement has no words
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl WordSource for Statement {
    fn word(&self, letter: char) -> Option<f64> {
        let letter = letter.to_ascii_uppercase();
        self.words
            .iter()
            .find(|w| w.letter == letter)
            .map(|w| w.value)
    }

    fn words(&self, letter: char) -> Vec<f64> {
        let letter = letter.to_ascii_uppercase();
        self.words
            .iter()
            .filter(|w| w.letter == letter)
            .map(|w| w.value)
            .collect()
    }
}

impl FromIterator<(char, f64)> for Statement {
    fn from_iter<T: IntoIterator<Item = (char, f64)>>(iter: T) -> Self {
        Self {
            words: iter.into_iter().map(Word::from).collect(),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for word in &self.words {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{}", word)?;
            first = false;
        }
        Ok(())
    }
}
