use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

pub const PLACEHOLDER_TEXT: &str = "Image Missing";

static LANDMARK_TOKENS: Lazy<Vec<Token>> = Lazy::new(|| {
    (1..=12)
        .map(|n| Token::new(format!("images/landmark{n}.jpg")))
        .collect()
});

static LETTER_TOKENS: Lazy<Vec<Token>> =
    Lazy::new(|| ('A'..='Z').map(|c| Token::new(c.to_string())).collect());

/// Identity shared by exactly two cards on a board: an image path or a letter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(Arc<str>);

impl Token {
    pub fn new(value: impl Into<Arc<str>>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Supplies the distinct tokens a board draws its pairs from.
pub trait TokenSource {
    fn tokens(&self) -> &[Token];
}

/// Built-in token sets, one per visual theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    /// Landmark photos drawn on a canvas.
    #[default]
    Landmarks,
    /// Capital letters rendered as DOM text.
    Letters,
}

impl Theme {
    pub fn capacity(self) -> usize {
        self.tokens().len()
    }
}

impl TokenSource for Theme {
    fn tokens(&self) -> &[Token] {
        match self {
            Theme::Landmarks => &LANDMARK_TOKENS,
            Theme::Letters => &LETTER_TOKENS,
        }
    }
}

impl TokenSource for Vec<Token> {
    fn tokens(&self) -> &[Token] {
        self
    }
}

impl TokenSource for [Token] {
    fn tokens(&self) -> &[Token] {
        self
    }
}

/// What a renderer should draw on the face side of a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Face<'a> {
    Token(&'a Token),
    Placeholder,
}

/// Tracks face assets the host failed to load.
///
/// A failed asset only changes how a face is drawn. Matching still compares
/// tokens, so gameplay and scoring never depend on asset state.
#[derive(Debug, Clone, Default)]
pub struct FaceRegistry {
    failed: HashSet<Token>,
}

impl FaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when the token was not already marked failed.
    pub fn mark_failed(&mut self, token: Token) -> bool {
        let inserted = self.failed.insert(token);
        if inserted {
            tracing::warn!("face asset unavailable, using placeholder");
        }
        inserted
    }

    pub fn mark_loaded(&mut self, token: &Token) -> bool {
        self.failed.remove(token)
    }

    pub fn is_failed(&self, token: &Token) -> bool {
        self.failed.contains(token)
    }

    pub fn face<'a>(&self, token: &'a Token) -> Face<'a> {
        if self.is_failed(token) {
            Face::Placeholder
        } else {
            Face::Token(token)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landmark_theme_lists_image_paths_in_order() {
        let tokens = Theme::Landmarks.tokens();

        assert_eq!(tokens.len(), 12);
        assert_eq!(tokens[0].as_str(), "images/landmark1.jpg");
        assert_eq!(tokens[5].as_str(), "images/landmark6.jpg");
    }

    #[test]
    fn letter_theme_covers_the_alphabet() {
        let tokens = Theme::Letters.tokens();

        assert_eq!(Theme::Letters.capacity(), 26);
        assert_eq!(tokens.first().map(Token::as_str), Some("A"));
        assert_eq!(tokens.last().map(Token::as_str), Some("Z"));
    }

    #[test]
    fn failed_asset_falls_back_to_placeholder_until_reloaded() {
        let mut faces = FaceRegistry::new();
        let token = Token::from("images/landmark3.jpg");

        assert_eq!(faces.face(&token), Face::Token(&token));
        assert!(faces.mark_failed(token.clone()));
        assert!(!faces.mark_failed(token.clone()));
        assert_eq!(faces.face(&token), Face::Placeholder);

        assert!(faces.mark_loaded(&token));
        assert_eq!(faces.face(&token), Face::Token(&token));
    }
}
