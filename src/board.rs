use std::collections::HashMap;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::{GameError, GameResult};
use crate::tokens::{Token, TokenSource};

pub const CARD_WIDTH: f64 = 120.0;
pub const CARD_HEIGHT: f64 = 160.0;
pub const CARD_PADDING: f64 = 10.0;
pub const DEFAULT_COLUMNS: usize = 4;

/// One cell of the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub index: usize,
    pub row: usize,
    pub col: usize,
    pub token: Token,
    pub flipped: bool,
    pub matched: bool,
}

impl Card {
    /// Concealed and unmatched, so a flip may select it.
    pub fn is_selectable(&self) -> bool {
        !self.flipped && !self.matched
    }
}

/// Fixed cell size used to map pointer coordinates onto the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellGeometry {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl CellGeometry {
    /// Top-left corner of the card at `(row, col)`.
    pub fn origin(&self, row: usize, col: usize) -> (f64, f64) {
        (
            col as f64 * (self.width + self.padding) + self.padding,
            row as f64 * (self.height + self.padding) + self.padding,
        )
    }

    /// `(width, height)` of a surface holding `rows × cols` cards.
    pub fn surface_size(&self, rows: usize, cols: usize) -> (f64, f64) {
        (
            cols as f64 * (self.width + self.padding) + self.padding,
            rows as f64 * (self.height + self.padding) + self.padding,
        )
    }

    /// Maps a point to the cell whose card rectangle contains it, edges included.
    /// Points in the padding gutters map to nothing.
    pub fn cell_at(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        let col = axis_cell(x, self.width, self.padding)?;
        let row = axis_cell(y, self.height, self.padding)?;
        Some((row, col))
    }
}

impl Default for CellGeometry {
    fn default() -> Self {
        Self {
            width: CARD_WIDTH,
            height: CARD_HEIGHT,
            padding: CARD_PADDING,
        }
    }
}

/// Shuffled grid of paired cards laid out row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    cards: Vec<Card>,
    columns: usize,
    geometry: CellGeometry,
}

impl Board {
    /// Takes `pair_count` distinct tokens from `source`, doubles them and
    /// lays out a Fisher-Yates shuffle of the result.
    pub fn initialize<S, R>(
        pair_count: usize,
        columns: usize,
        source: &S,
        rng: &mut R,
    ) -> GameResult<Self>
    where
        S: TokenSource + ?Sized,
        R: Rng + ?Sized,
    {
        if pair_count == 0 {
            return Err(GameError::InvalidPairCount);
        }
        let available = source.tokens();
        if available.len() < pair_count {
            return Err(GameError::NotEnoughTokens {
                requested: pair_count,
                available: available.len(),
            });
        }

        let mut tokens: Vec<Token> = available[..pair_count]
            .iter()
            .chain(available[..pair_count].iter())
            .cloned()
            .collect();
        tokens.shuffle(rng);

        Self::from_tokens(tokens, columns)
    }

    /// Lays out `tokens` as given. Every token must occur exactly twice.
    pub fn from_tokens(tokens: Vec<Token>, columns: usize) -> GameResult<Self> {
        if columns == 0 {
            return Err(GameError::InvalidColumns);
        }
        if tokens.is_empty() {
            return Err(GameError::InvalidPairCount);
        }
        check_pairs(&tokens)?;

        let cards = tokens
            .into_iter()
            .enumerate()
            .map(|(index, token)| Card {
                index,
                row: index / columns,
                col: index % columns,
                token,
                flipped: false,
                matched: false,
            })
            .collect();

        Ok(Self {
            cards,
            columns,
            geometry: CellGeometry::default(),
        })
    }

    pub fn with_geometry(mut self, geometry: CellGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn pair_count(&self) -> usize {
        self.cards.len() / 2
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.cards.len().div_ceil(self.columns)
    }

    pub fn geometry(&self) -> CellGeometry {
        self.geometry
    }

    pub fn surface_size(&self) -> (f64, f64) {
        self.geometry.surface_size(self.rows(), self.columns)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    /// Grid lookup. Out-of-range coordinates yield `None`.
    pub fn card_at(&self, row: usize, col: usize) -> Option<&Card> {
        if row >= self.rows() || col >= self.columns {
            return None;
        }
        self.cards.get(row * self.columns + col)
    }

    /// Pointer lookup through the cell geometry. Matched cards are skipped.
    pub fn card_at_point(&self, x: f64, y: f64) -> Option<&Card> {
        let (row, col) = self.geometry.cell_at(x, y)?;
        self.card_at(row, col).filter(|card| !card.matched)
    }

    /// Turns a concealed, unmatched card face up.
    /// Returns `false` and leaves the card alone otherwise.
    pub fn reveal(&mut self, index: usize) -> bool {
        match self.cards.get_mut(index) {
            Some(card) if card.is_selectable() => {
                card.flipped = true;
                true
            }
            _ => false,
        }
    }

    /// Turns a revealed, unmatched card face down again.
    pub fn conceal(&mut self, index: usize) -> bool {
        match self.cards.get_mut(index) {
            Some(card) if card.flipped && !card.matched => {
                card.flipped = false;
                true
            }
            _ => false,
        }
    }

    /// Locks a card face up for the rest of the game.
    pub fn mark_matched(&mut self, index: usize) -> bool {
        match self.cards.get_mut(index) {
            Some(card) if !card.matched => {
                card.matched = true;
                card.flipped = true;
                true
            }
            _ => false,
        }
    }

    pub fn matched_count(&self) -> usize {
        self.cards.iter().filter(|card| card.matched).count()
    }

    /// CRC32 of the column count and token order. Changes whenever a new
    /// layout is dealt, so renderers know to rebuild their grid.
    pub fn layout_hash(&self) -> u32 {
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&(self.columns as u32).to_le_bytes());
        for card in &self.cards {
            hasher.update(card.token.as_str().as_bytes());
            hasher.update(&[0]);
        }
        hasher.finalize()
    }
}

fn check_pairs(tokens: &[Token]) -> GameResult<()> {
    let mut counts: HashMap<&Token, usize> = HashMap::new();
    for token in tokens {
        *counts.entry(token).or_default() += 1;
    }
    match counts.into_iter().find(|(_, count)| *count != 2) {
        Some((token, _)) => Err(GameError::UnpairedTokens(token.to_string())),
        None => Ok(()),
    }
}

fn axis_cell(pos: f64, size: f64, padding: f64) -> Option<usize> {
    if !pos.is_finite() || pos < padding {
        return None;
    }
    let stride = size + padding;
    let cell = ((pos - padding) / stride).floor();
    let start = cell * stride + padding;
    if pos <= start + size {
        Some(cell as usize)
    } else {
        None
    }
}
