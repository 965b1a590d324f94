//! Spell scroll and wand tables
//!
//! Builds an equiprobable table of every spell scroll (or wand) of one spell
//! rank, optionally narrowed to a tradition and a rarity. Cantrips, focus
//! spells and rituals cannot be put on scrolls or wands and are never listed.

use crate::catalog::{load_documents, CatalogError, LoadReport};
use crate::ids::IdSource;
use crate::item::Rarity;
use crate::table::{RollTable, TableBuilder, TableError, TableOptions, TableSource, Weighting};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;

/// Highest spell rank
pub const MAX_SPELL_RANK: u32 = 10;

/// Highest spell rank that can be stored in a wand
pub const MAX_WAND_RANK: u32 = 9;

/// Default UUID template for PF2e spells
pub const SPELL_UUID_TEMPLATE: &str = "Compendium.pf2e.spells-srd.Item.{id}";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScrollError {
    #[error("There are no spells above rank 10 (requested rank {0})")]
    RankTooHigh(u32),

    #[error("There are no wands for spells above rank 9 (requested rank {0})")]
    WandRankTooHigh(u32),

    #[error("Spell rank must be at least 1")]
    RankZero,

    #[error(transparent)]
    Table(#[from] TableError),
}

/// Magic tradition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tradition {
    Arcane,
    Divine,
    Occult,
    Primal,
}

impl Tradition {
    pub fn name(&self) -> &'static str {
        match self {
            Tradition::Arcane => "arcane",
            Tradition::Divine => "divine",
            Tradition::Occult => "occult",
            Tradition::Primal => "primal",
        }
    }
}

impl std::str::FromStr for Tradition {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "arcane" => Ok(Tradition::Arcane),
            "divine" => Ok(Tradition::Divine),
            "occult" => Ok(Tradition::Occult),
            "primal" => Ok(Tradition::Primal),
            _ => Err(format!("unknown tradition: {}", s)),
        }
    }
}

/// Scroll or wand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpellForm {
    Scroll,
    Wand,
}

impl SpellForm {
    pub fn title(&self) -> &'static str {
        match self {
            SpellForm::Scroll => "Scroll",
            SpellForm::Wand => "Wand",
        }
    }
}

/// A spell from the spell catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpellRecord {
    pub id: String,
    pub name: String,
    pub img: String,
    pub rank: u32,
    pub rarity: Rarity,
    pub traits: BTreeSet<String>,
    pub traditions: BTreeSet<Tradition>,
    pub ritual: bool,
}

impl SpellRecord {
    pub fn is_cantrip(&self) -> bool {
        self.traits.contains("cantrip")
    }

    pub fn is_focus(&self) -> bool {
        self.traits.contains("focus")
    }
}

#[derive(Deserialize)]
struct RawSpell {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    #[serde(default)]
    img: Option<String>,
    #[serde(default)]
    system: RawSpellSystem,
}

#[derive(Deserialize, Default)]
struct RawSpellSystem {
    #[serde(default)]
    level: Option<RawLevel>,
    #[serde(default)]
    traits: RawSpellTraits,
    #[serde(default)]
    ritual: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct RawLevel {
    value: Option<u32>,
}

#[derive(Deserialize, Default)]
struct RawSpellTraits {
    #[serde(default)]
    rarity: Option<String>,
    #[serde(default)]
    value: Vec<String>,
    #[serde(default)]
    traditions: Vec<String>,
}

/// Parse one PF2e spell document
pub fn parse_spell(json: &str) -> Result<SpellRecord, serde_json::Error> {
    let raw: RawSpell = serde_json::from_str(json)?;
    let system = raw.system;
    let traits = system.traits;

    Ok(SpellRecord {
        id: raw.id,
        name: raw.name,
        img: raw.img.unwrap_or_default(),
        rank: system.level.and_then(|l| l.value).unwrap_or(0),
        rarity: traits
            .rarity
            .as_deref()
            .and_then(Rarity::from_tag)
            .unwrap_or_default(),
        traits: traits.value.into_iter().collect(),
        // Unknown traditions (e.g. from homebrew) are ignored
        traditions: traits
            .traditions
            .iter()
            .filter_map(|t| t.parse().ok())
            .collect(),
        ritual: system.ritual.is_some_and(|r| !r.is_null()),
    })
}

/// Load every spell document under `dir`, skipping unreadable files
pub fn load_spells<P: AsRef<Path>>(dir: P) -> Result<(Vec<SpellRecord>, LoadReport), CatalogError> {
    load_documents(dir.as_ref(), parse_spell)
}

/// Which spells to put in the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollQuery {
    pub form: SpellForm,
    pub rank: u32,
    /// `None` accepts every tradition
    pub tradition: Option<Tradition>,
    /// `None` accepts every rarity
    pub rarity: Option<Rarity>,
}

impl ScrollQuery {
    pub fn new(form: SpellForm, rank: u32) -> Self {
        Self {
            form,
            rank,
            tradition: None,
            rarity: None,
        }
    }

    pub fn validate(&self) -> Result<(), ScrollError> {
        if self.rank == 0 {
            return Err(ScrollError::RankZero);
        }
        if self.rank > MAX_SPELL_RANK {
            return Err(ScrollError::RankTooHigh(self.rank));
        }
        if self.form == SpellForm::Wand && self.rank > MAX_WAND_RANK {
            return Err(ScrollError::WandRankTooHigh(self.rank));
        }
        Ok(())
    }

    /// Whether a spell can appear in this table
    pub fn accepts(&self, spell: &SpellRecord) -> bool {
        if spell.rank != self.rank || spell.is_cantrip() || spell.is_focus() || spell.ritual {
            return false;
        }
        if let Some(rarity) = self.rarity {
            if spell.rarity != rarity {
                return false;
            }
        }
        if let Some(tradition) = self.tradition {
            if !spell.traditions.contains(&tradition) {
                return false;
            }
        }
        true
    }

    /// Table name, e.g. "Wand Table - Rank 3 arcane uncommon"
    pub fn table_name(&self) -> String {
        let mut name = format!("{} Table - Rank {}", self.form.title(), self.rank);
        if let Some(tradition) = self.tradition {
            name.push(' ');
            name.push_str(tradition.name());
        }
        if let Some(rarity) = self.rarity {
            name.push(' ');
            name.push_str(rarity.tag());
        }
        name
    }
}

/// A spell as it appears on a scroll or wand
struct SpellEntry<'a> {
    spell: &'a SpellRecord,
    form: SpellForm,
}

impl TableSource for SpellEntry<'_> {
    fn source_id(&self) -> &str {
        &self.spell.id
    }

    fn display_name(&self) -> String {
        format!(
            "{} of {} (Rank {})",
            self.form.title(),
            self.spell.name,
            self.spell.rank
        )
    }

    fn level(&self) -> u32 {
        self.spell.rank
    }

    fn rarity(&self) -> Rarity {
        self.spell.rarity
    }

    fn img(&self) -> &str {
        &self.spell.img
    }
}

/// Build an equiprobable scroll or wand table
pub fn build_scroll_table<I: IdSource + ?Sized>(
    spells: &[SpellRecord],
    query: &ScrollQuery,
    ids: &mut I,
) -> Result<RollTable, ScrollError> {
    query.validate()?;

    let entries: Vec<SpellEntry<'_>> = spells
        .iter()
        .filter(|spell| query.accepts(spell))
        .map(|spell| SpellEntry {
            spell,
            form: query.form,
        })
        .collect();

    tracing::info!("{}: {} eligible spells", query.table_name(), entries.len());

    let refs: Vec<&SpellEntry<'_>> = entries.iter().collect();
    let options = TableOptions::new(query.table_name())
        .description(format!(
            "Generated {} table for rank {} spells",
            query.form.title().to_lowercase(),
            query.rank
        ))
        .weighting(Weighting::Uniform)
        .document_uuid(SPELL_UUID_TEMPLATE);

    Ok(TableBuilder::default().build(&refs, &options, ids)?)
}
