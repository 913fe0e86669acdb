//! Reference data: stocks, nationalities, event and chance decks, the board.
//!
//! - `StockDefinition`: immutable stock properties (base price, valuation dice)
//! - `Catalog`: validated lookup over every record type
//!
//! The standard 1950-2026 data set is bundled as JSON and loaded with
//! `Catalog::standard()`.

pub mod definition;
pub mod registry;

pub use definition::{
    BoardTile, Category, ChanceCard, ChanceEffect, EventCard, EventImpact, ImpactTarget, Money,
    Nationality, NationalityBonus, NationalityWeakness, StockDefinition, StockId,
};
pub use registry::{Catalog, BOARD_SIZE};
