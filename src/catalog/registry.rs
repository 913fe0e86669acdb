//! Catalog of reference data.
//!
//! The `Catalog` holds every stock, nationality, card and tile for a game.
//! It is validated once on construction and shared read-only afterwards.

use rustc_hash::FxHashMap;
use serde::de::DeserializeOwned;

use super::definition::{BoardTile, ChanceCard, EventCard, Nationality, StockDefinition, StockId};
use crate::error::CatalogError;

/// Number of tiles on the board.
pub const BOARD_SIZE: usize = 32;

const STANDARD_STOCKS: &str = include_str!("data/stocks.json");
const STANDARD_NATIONALITIES: &str = include_str!("data/nationalities.json");
const STANDARD_EVENTS: &str = include_str!("data/events.json");
const STANDARD_CHANCES: &str = include_str!("data/chances.json");
const STANDARD_BOARD: &str = include_str!("data/board.json");

/// Validated reference data.
///
/// ## Example
///
/// ```
/// use stock_exchange::catalog::{Catalog, StockId};
///
/// let catalog = Catalog::standard().unwrap();
/// assert_eq!(catalog.board().len(), 32);
/// assert!(catalog.stock(&StockId::new("petro_atlantic")).is_some());
/// ```
#[derive(Clone, Debug)]
pub struct Catalog {
    stocks: Vec<StockDefinition>,
    stock_index: FxHashMap<StockId, usize>,
    nationalities: Vec<Nationality>,
    events: Vec<EventCard>,
    chances: Vec<ChanceCard>,
    board: Vec<BoardTile>,
}

impl Catalog {
    /// Build a catalog from already-parsed records.
    pub fn new(
        stocks: Vec<StockDefinition>,
        nationalities: Vec<Nationality>,
        events: Vec<EventCard>,
        chances: Vec<ChanceCard>,
        board: Vec<BoardTile>,
    ) -> Result<Self, CatalogError> {
        if stocks.is_empty() {
            return Err(CatalogError::NoStocks);
        }
        if events.is_empty() {
            return Err(CatalogError::EmptyDeck("event"));
        }
        if chances.is_empty() {
            return Err(CatalogError::EmptyDeck("chance"));
        }
        if board.len() != BOARD_SIZE {
            return Err(CatalogError::BoardSize {
                expected: BOARD_SIZE,
                found: board.len(),
            });
        }

        let mut stock_index = FxHashMap::default();
        for (i, stock) in stocks.iter().enumerate() {
            if stock_index.insert(stock.id.clone(), i).is_some() {
                return Err(CatalogError::DuplicateId {
                    what: "stock",
                    id: stock.id.to_string(),
                });
            }
        }

        check_unique("nationality", nationalities.iter().map(|n| n.id.as_str()))?;
        check_unique("event", events.iter().map(|e| e.id.as_str()))?;
        check_unique("chance", chances.iter().map(|c| c.id.as_str()))?;

        for (index, tile) in board.iter().enumerate() {
            if let Some(id) = tile.stock_id() {
                if !stock_index.contains_key(id) {
                    return Err(CatalogError::UnknownTileStock {
                        index,
                        stock: id.clone(),
                    });
                }
            }
        }

        Ok(Self {
            stocks,
            stock_index,
            nationalities,
            events,
            chances,
            board,
        })
    }

    /// Parse and validate a catalog from JSON arrays, one per record type.
    pub fn from_json(
        stocks: &str,
        nationalities: &str,
        events: &str,
        chances: &str,
        board: &str,
    ) -> Result<Self, CatalogError> {
        Self::new(
            parse("stock", stocks)?,
            parse("nationality", nationalities)?,
            parse("event", events)?,
            parse("chance", chances)?,
            parse("board", board)?,
        )
    }

    /// The bundled 1950-2026 data set.
    pub fn standard() -> Result<Self, CatalogError> {
        Self::from_json(
            STANDARD_STOCKS,
            STANDARD_NATIONALITIES,
            STANDARD_EVENTS,
            STANDARD_CHANCES,
            STANDARD_BOARD,
        )
    }

    /// Look up a stock definition.
    #[must_use]
    pub fn stock(&self, id: &StockId) -> Option<&StockDefinition> {
        self.stock_index.get(id).map(|&i| &self.stocks[i])
    }

    /// All stocks in data-file order.
    #[must_use]
    pub fn stocks(&self) -> &[StockDefinition] {
        &self.stocks
    }

    /// Look up a nationality by id.
    #[must_use]
    pub fn nationality(&self, id: &str) -> Option<&Nationality> {
        self.nationalities.iter().find(|n| n.id == id)
    }

    #[must_use]
    pub fn nationalities(&self) -> &[Nationality] {
        &self.nationalities
    }

    #[must_use]
    pub fn events(&self) -> &[EventCard] {
        &self.events
    }

    #[must_use]
    pub fn chances(&self) -> &[ChanceCard] {
        &self.chances
    }

    #[must_use]
    pub fn board(&self) -> &[BoardTile] {
        &self.board
    }

    /// Tile at a board position, wrapping around the board.
    #[must_use]
    pub fn tile(&self, position: usize) -> &BoardTile {
        &self.board[position % self.board.len()]
    }
}

fn parse<T: DeserializeOwned>(what: &'static str, json: &str) -> Result<Vec<T>, CatalogError> {
    serde_json::from_str(json).map_err(|source| CatalogError::Json { what, source })
}

fn check_unique<'a>(
    what: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), CatalogError> {
    let mut seen = rustc_hash::FxHashSet::default();
    for id in ids {
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateId {
                what,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}
