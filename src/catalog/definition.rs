//! Reference data types: stocks, nationalities, cards and board tiles.
//!
//! Everything here is immutable for the lifetime of a game. Field names
//! serialize in camelCase so the bundled JSON reads like ordinary records.

use serde::{Deserialize, Serialize};

/// Whole-dollar amount. Cash, prices and dividends are all integers.
pub type Money = i64;

/// Identifier of a stock definition (e.g. `"petro_atlantic"`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StockId(pub String);

impl StockId {
    /// Create a new stock ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StockId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Market sector of a stock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Energy,
    Industry,
    Tech,
    Consumption,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 4] = [
        Category::Energy,
        Category::Industry,
        Category::Tech,
        Category::Consumption,
    ];

    /// Lowercase name as used in data files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Energy => "energy",
            Category::Industry => "industry",
            Category::Tech => "tech",
            Category::Consumption => "consumption",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static stock definition.
///
/// `neutral_roll` is the d20 result at which valuation leaves the price
/// unchanged; each pip above or below moves it by `rate_of_change` percent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockDefinition {
    pub id: StockId,
    pub name: String,
    pub category: Category,
    /// Starting market price.
    pub price: Money,
    pub neutral_roll: i32,
    /// Percent change per die pip away from `neutral_roll`.
    pub rate_of_change: f64,
    #[serde(default)]
    pub description: String,
}

impl StockDefinition {
    /// Percent change implied by a valuation roll.
    #[must_use]
    pub fn percent_change(&self, roll: u32) -> f64 {
        f64::from(self.roll_offset(roll)) * self.rate_of_change
    }

    /// Signed distance of a roll from the neutral roll.
    #[must_use]
    pub fn roll_offset(&self, roll: u32) -> i32 {
        i32::try_from(roll).unwrap_or(i32::MAX) - self.neutral_roll
    }
}

/// Extra upside for holders of a favoured category.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NationalityBonus {
    pub category: Category,
    pub percentage: f64,
}

/// Extra downside when a tagged event hits a sensitive category.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NationalityWeakness {
    pub category: Category,
    pub event_tag: String,
    pub extra_penalty: f64,
}

/// A nationality a player picks at setup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nationality {
    pub id: String,
    pub name: String,
    pub flag: String,
    pub bonus: NationalityBonus,
    pub weakness: NationalityWeakness,
    #[serde(default)]
    pub description: String,
}

impl Nationality {
    /// Whether the bonus applies to stocks of this category.
    #[must_use]
    pub fn favours(&self, category: Category) -> bool {
        self.bonus.category == category
    }

    /// Whether an event carrying `tags` triggers the weakness for `category`.
    #[must_use]
    pub fn is_weak_to(&self, category: Category, tags: &[String]) -> bool {
        self.weakness.category == category && tags.iter().any(|t| *t == self.weakness.event_tag)
    }
}

/// Which stocks an event touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactTarget {
    All,
    Energy,
    Industry,
    Tech,
    Consumption,
}

impl ImpactTarget {
    /// Whether a stock of `category` is affected.
    #[must_use]
    pub fn matches(self, category: Category) -> bool {
        match self {
            ImpactTarget::All => true,
            ImpactTarget::Energy => category == Category::Energy,
            ImpactTarget::Industry => category == Category::Industry,
            ImpactTarget::Tech => category == Category::Tech,
            ImpactTarget::Consumption => category == Category::Consumption,
        }
    }
}

/// Market effect of an event card.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventImpact {
    pub category: ImpactTarget,
    /// Signed percent applied to every matching stock.
    pub modifier: f64,
}

/// Historical event drawn when landing on an event tile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventCard {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub impact: EventImpact,
}

/// What a chance card does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChanceEffect {
    GainCash,
    LoseCash,
    BoostRandomStock,
    HurtRandomStock,
    BoostAllStocks,
    HurtAllStocks,
}

/// Chance card drawn when landing on a chance tile.
///
/// `value` is dollars for the cash effects and a percentage for the stock effects.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChanceCard {
    pub id: String,
    pub title: String,
    pub description: String,
    pub effect: ChanceEffect,
    pub value: Money,
}

/// One board cell.
///
/// Unknown tile types in data files load as `Blank`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoardTile {
    Stock {
        #[serde(rename = "stockId")]
        stock_id: StockId,
    },
    Event,
    Chance,
    #[serde(other)]
    Blank,
}

impl BoardTile {
    /// Convenience constructor for a stock tile.
    pub fn stock(id: impl Into<String>) -> Self {
        BoardTile::Stock { stock_id: StockId::new(id) }
    }

    /// The stock on this tile, if any.
    #[must_use]
    pub fn stock_id(&self) -> Option<&StockId> {
        match self {
            BoardTile::Stock { stock_id } => Some(stock_id),
            _ => None,
        }
    }
}
