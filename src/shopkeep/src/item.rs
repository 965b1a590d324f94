//! Item record types
//!
//! An [`ItemRecord`] is the flattened, read-only view of one catalog entry.
//! Parsing from PF2e documents lives in [`crate::catalog`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Item rarity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Unique,
}

impl Rarity {
    /// All rarities, most common first
    pub const ALL: [Rarity; 4] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Unique,
    ];

    /// Parse a rarity tag as it appears in item documents
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "common" => Some(Rarity::Common),
            "uncommon" => Some(Rarity::Uncommon),
            "rare" => Some(Rarity::Rare),
            "unique" => Some(Rarity::Unique),
            _ => None,
        }
    }

    /// Lowercase tag
    pub fn tag(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Unique => "unique",
        }
    }
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl std::str::FromStr for Rarity {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rarity::from_tag(s).ok_or_else(|| format!("unknown rarity: {}", s))
    }
}

/// Item kind (the document `type`)
///
/// Kinds outside the known set are kept verbatim so allow lists can still
/// name them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemKind {
    Weapon,
    Armor,
    Shield,
    Equipment,
    Consumable,
    Treasure,
    Backpack,
    Kit,
    Book,
    Other(String),
}

impl ItemKind {
    pub fn as_str(&self) -> &str {
        match self {
            ItemKind::Weapon => "weapon",
            ItemKind::Armor => "armor",
            ItemKind::Shield => "shield",
            ItemKind::Equipment => "equipment",
            ItemKind::Consumable => "consumable",
            ItemKind::Treasure => "treasure",
            ItemKind::Backpack => "backpack",
            ItemKind::Kit => "kit",
            ItemKind::Book => "book",
            ItemKind::Other(s) => s,
        }
    }
}

impl From<String> for ItemKind {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "weapon" => ItemKind::Weapon,
            "armor" => ItemKind::Armor,
            "shield" => ItemKind::Shield,
            "equipment" => ItemKind::Equipment,
            "consumable" => ItemKind::Consumable,
            "treasure" => ItemKind::Treasure,
            "backpack" => ItemKind::Backpack,
            "kit" => ItemKind::Kit,
            "book" => ItemKind::Book,
            _ => ItemKind::Other(s),
        }
    }
}

impl From<&str> for ItemKind {
    fn from(s: &str) -> Self {
        ItemKind::from(s.to_string())
    }
}

impl From<ItemKind> for String {
    fn from(kind: ItemKind) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A price in copper pieces, the base currency unit.
///
/// Serializes as a PF2e coin map (`{ pp, gp, sp, cp }`), so both item
/// documents and shop configuration can write `{ gp = 1000 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(u64);

const CP_PER_SP: u64 = 10;
const CP_PER_GP: u64 = 100;
const CP_PER_PP: u64 = 1000;

impl Price {
    pub const ZERO: Price = Price(0);

    pub fn from_copper(cp: u64) -> Self {
        Price(cp)
    }

    pub fn from_gp(gp: u64) -> Self {
        Price(gp.saturating_mul(CP_PER_GP))
    }

    pub fn copper(&self) -> u64 {
        self.0
    }

    /// Whole gold pieces, rounded down
    pub fn gp(&self) -> u64 {
        self.0 / CP_PER_GP
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let gp = self.gp();
        let sp = (self.0 % CP_PER_GP) / CP_PER_SP;
        let cp = self.0 % CP_PER_SP;
        match (gp, sp, cp) {
            (_, 0, 0) => write!(f, "{} gp", gp),
            (0, _, 0) => write!(f, "{} sp", sp),
            (0, 0, _) => write!(f, "{} cp", cp),
            _ => write!(f, "{} gp {} sp {} cp", gp, sp, cp),
        }
    }
}

/// Coin map as written in PF2e documents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coins {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub pp: u64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub gp: u64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub sp: u64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub cp: u64,
}

fn is_zero(v: &u64) -> bool {
    *v == 0
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Price {0:?} overflows a copper count")]
pub struct PriceOverflow(pub Coins);

impl TryFrom<Coins> for Price {
    type Error = PriceOverflow;

    fn try_from(c: Coins) -> Result<Self, Self::Error> {
        [(c.pp, CP_PER_PP), (c.gp, CP_PER_GP), (c.sp, CP_PER_SP), (c.cp, 1)]
            .into_iter()
            .try_fold(0u64, |total, (n, rate)| n.checked_mul(rate)?.checked_add(total))
            .map(Price)
            .ok_or(PriceOverflow(c))
    }
}

impl From<Price> for Coins {
    fn from(p: Price) -> Self {
        Coins {
            pp: 0,
            gp: p.0 / CP_PER_GP,
            sp: (p.0 % CP_PER_GP) / CP_PER_SP,
            cp: p.0 % CP_PER_SP,
        }
    }
}

impl Serialize for Price {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Coins::from(*self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let coins = Coins::deserialize(deserializer)?;
        Price::try_from(coins).map_err(serde::de::Error::custom)
    }
}

/// Potency grade carried as a parenthetical name suffix, e.g. "Antidote (Lesser)"
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Grade {
    Base,
    Minor,
    Lesser,
    Moderate,
    Greater,
    Major,
    True,
}

impl Grade {
    /// Grade encoded in an item name; `Base` when no grade suffix is present
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        const SUFFIXES: [(&str, Grade); 6] = [
            ("(minor)", Grade::Minor),
            ("(lesser)", Grade::Lesser),
            ("(moderate)", Grade::Moderate),
            ("(greater)", Grade::Greater),
            ("(major)", Grade::Major),
            ("(true)", Grade::True),
        ];
        SUFFIXES
            .iter()
            .find(|(suffix, _)| lower.contains(suffix))
            .map(|(_, grade)| *grade)
            .unwrap_or(Grade::Base)
    }

    /// Minor and lesser grades
    pub fn is_low(&self) -> bool {
        matches!(self, Grade::Minor | Grade::Lesser)
    }
}

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub img: String,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default)]
    pub price: Price,
    pub kind: ItemKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub traits: BTreeSet<String>,
}

impl ItemRecord {
    /// Minimal record, mostly useful for tests and fixtures
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            img: String::new(),
            level: 0,
            rarity: Rarity::Common,
            price: Price::ZERO,
            kind,
            category: None,
            traits: BTreeSet::new(),
        }
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    pub fn with_price(mut self, price: Price) -> Self {
        self.price = price;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_traits<I, S>(mut self, traits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.traits.extend(traits.into_iter().map(Into::into));
        self
    }

    pub fn has_trait(&self, t: &str) -> bool {
        self.traits.contains(t)
    }

    pub fn grade(&self) -> Grade {
        Grade::from_name(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rarity_from_tag() {
        assert_eq!(Rarity::from_tag("common"), Some(Rarity::Common));
        assert_eq!(Rarity::from_tag("Uncommon"), Some(Rarity::Uncommon));
        assert_eq!(Rarity::from_tag(" rare "), Some(Rarity::Rare));
        assert_eq!(Rarity::from_tag("unique"), Some(Rarity::Unique));
        assert_eq!(Rarity::from_tag("legendary"), None);
    }

    #[test]
    fn test_item_kind_known_and_other() {
        assert_eq!(ItemKind::from("weapon"), ItemKind::Weapon);
        assert_eq!(ItemKind::from("Armor"), ItemKind::Armor);
        assert_eq!(
            ItemKind::from("ammo"),
            ItemKind::Other("ammo".to_string())
        );
        assert_eq!(ItemKind::from("ammo").as_str(), "ammo");
    }

    #[test]
    fn test_price_from_coins() {
        let coins = Coins {
            pp: 1,
            gp: 2,
            sp: 3,
            cp: 4,
        };
        assert_eq!(Price::try_from(coins).unwrap().copper(), 1234);
        assert_eq!(Price::from_gp(5).copper(), 500);
        assert_eq!(Price::from_copper(1234).gp(), 12);
    }

    #[test]
    fn test_price_deserializes_from_coin_map() {
        let price: Price = serde_json::from_str(r#"{"gp": 15, "sp": 5}"#).unwrap();
        assert_eq!(price, Price::from_copper(1550));

        #[derive(Deserialize)]
        struct Wrapper {
            p: Price,
        }
        let wrapper: Wrapper = toml::from_str("p = { gp = 1000 }").unwrap();
        assert_eq!(wrapper.p, Price::from_gp(1000));
    }

    #[test]
    fn test_price_overflow_is_an_error() {
        let coins = Coins {
            pp: u64::MAX / 1000 + 1,
            ..Coins::default()
        };
        assert_eq!(Price::try_from(coins), Err(PriceOverflow(coins)));

        let coins = Coins {
            gp: u64::MAX / 100,
            cp: 100,
            ..Coins::default()
        };
        assert!(Price::try_from(coins).is_err());

        assert!(serde_json::from_str::<Price>(r#"{"pp": 18446744073709552}"#).is_err());
    }

    #[test]
    fn test_price_display() {
        assert_eq!(Price::from_gp(3).to_string(), "3 gp");
        assert_eq!(Price::from_copper(50).to_string(), "5 sp");
        assert_eq!(Price::from_copper(7).to_string(), "7 cp");
        assert_eq!(Price::from_copper(1234).to_string(), "12 gp 3 sp 4 cp");
    }

    #[test]
    fn test_grade_from_name() {
        assert_eq!(Grade::from_name("Antidote (Lesser)"), Grade::Lesser);
        assert_eq!(Grade::from_name("Elixir of Life (Minor)"), Grade::Minor);
        assert_eq!(Grade::from_name("Acid Flask (moderate)"), Grade::Moderate);
        assert_eq!(Grade::from_name("Bag of Holding (Type I)"), Grade::Base);
        assert_eq!(Grade::from_name("Torch"), Grade::Base);
        assert!(Grade::Lesser.is_low());
        assert!(Grade::Minor.is_low());
        assert!(!Grade::Greater.is_low());
    }

    #[test]
    fn test_builder_helpers() {
        let item = ItemRecord::new("abc", "Longsword", ItemKind::Weapon)
            .with_level(2)
            .with_rarity(Rarity::Uncommon)
            .with_category("martial")
            .with_traits(["versatile-p", "magical"]);
        assert_eq!(item.level, 2);
        assert_eq!(item.category.as_deref(), Some("martial"));
        assert!(item.has_trait("magical"));
        assert!(!item.has_trait("consumable"));
    }
}
