//! Item catalog loading
//!
//! A catalog is a directory tree of PF2e item documents, one JSON file per
//! item. Files that cannot be read or parsed are skipped with a warning and
//! listed in the [`LoadReport`]; one bad file never aborts a load.

use crate::item::{ItemKind, ItemRecord, Price, Rarity};
use rayon::prelude::*;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// PF2e document layout. Everything under `system` is optional; missing
// values take the defaults documented on `ItemRecord`.

#[derive(Deserialize)]
struct RawDocument {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    #[serde(default)]
    img: Option<String>,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    system: RawSystem,
}

#[derive(Deserialize, Default)]
struct RawSystem {
    #[serde(default)]
    level: Option<RawValue<u32>>,
    #[serde(default)]
    traits: Option<RawTraits>,
    #[serde(default)]
    price: Option<RawPrice>,
    #[serde(default)]
    category: Option<String>,
}

#[derive(Deserialize)]
struct RawValue<T> {
    value: Option<T>,
}

#[derive(Deserialize, Default)]
struct RawTraits {
    #[serde(default)]
    rarity: Option<String>,
    #[serde(default)]
    value: Vec<String>,
}

#[derive(Deserialize)]
struct RawPrice {
    #[serde(default)]
    value: Option<Price>,
}

impl From<RawDocument> for ItemRecord {
    fn from(doc: RawDocument) -> Self {
        let system = doc.system;
        let traits = system.traits.unwrap_or_default();

        let rarity = match traits.rarity.as_deref() {
            None => Rarity::Common,
            Some(tag) => Rarity::from_tag(tag).unwrap_or_else(|| {
                tracing::debug!("{}: unknown rarity '{}', treating as common", doc.name, tag);
                Rarity::Common
            }),
        };

        ItemRecord {
            id: doc.id,
            name: doc.name,
            img: doc.img.unwrap_or_default(),
            level: system.level.and_then(|l| l.value).unwrap_or(0),
            rarity,
            price: system.price.and_then(|p| p.value).unwrap_or_default(),
            kind: ItemKind::from(doc.kind),
            category: system.category.filter(|c| !c.is_empty()),
            traits: traits.value.into_iter().collect::<BTreeSet<_>>(),
        }
    }
}

/// Parse one PF2e item document
pub fn parse_item(json: &str) -> Result<ItemRecord, serde_json::Error> {
    let doc: RawDocument = serde_json::from_str(json)?;
    Ok(doc.into())
}

/// A file left out of the catalog
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of loading a catalog directory
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: Vec<SkippedFile>,
}

/// Read-only collection of item records
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<ItemRecord>,
}

impl Catalog {
    pub fn from_items(items: Vec<ItemRecord>) -> Self {
        Self { items }
    }

    /// Load every `*.json` item document under `dir`
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<(Self, LoadReport), CatalogError> {
        let (items, report) = load_documents(dir.as_ref(), parse_item)?;
        Ok((Self { items }, report))
    }

    pub fn items(&self) -> &[ItemRecord] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ItemRecord> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ItemRecord> {
        self.items.iter().find(|item| item.id == id)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a ItemRecord;
    type IntoIter = std::slice::Iter<'a, ItemRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Parse every `*.json` file under `dir` with `parse`.
///
/// Files are parsed in parallel but results keep path order, so repeated
/// loads of the same tree are identical.
pub fn load_documents<T, F>(dir: &Path, parse: F) -> Result<(Vec<T>, LoadReport), CatalogError>
where
    T: Send,
    F: Fn(&str) -> Result<T, serde_json::Error> + Sync,
{
    if !dir.is_dir() {
        return Err(CatalogError::NotADirectory(dir.to_path_buf()));
    }

    let paths = collect_json_files(dir);
    tracing::debug!("Found {} JSON files under {}", paths.len(), dir.display());

    let parsed: Vec<(PathBuf, Result<T, CatalogError>)> = paths
        .into_par_iter()
        .map(|path| {
            let result = load_file(&path, &parse);
            (path, result)
        })
        .collect();

    let mut documents = Vec::with_capacity(parsed.len());
    let mut report = LoadReport::default();

    for (path, result) in parsed {
        match result {
            Ok(doc) => documents.push(doc),
            Err(e) => {
                tracing::warn!("Skipping {}: {}", path.display(), e);
                report.skipped.push(SkippedFile {
                    path,
                    reason: e.to_string(),
                });
            }
        }
    }

    report.loaded = documents.len();
    Ok((documents, report))
}

fn load_file<T, F>(path: &Path, parse: &F) -> Result<T, CatalogError>
where
    F: Fn(&str) -> Result<T, serde_json::Error>,
{
    let content = std::fs::read_to_string(path)?;
    Ok(parse(&content)?)
}

fn collect_json_files(dir: &Path) -> Vec<PathBuf> {
    walkdir::WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case("json"))
                .unwrap_or(false)
        })
        .collect()
}

/// Item count per rarity
pub fn rarity_breakdown<'a, I>(items: I) -> BTreeMap<Rarity, usize>
where
    I: IntoIterator<Item = &'a ItemRecord>,
{
    let mut counts = BTreeMap::new();
    for item in items {
        *counts.entry(item.rarity).or_insert(0) += 1;
    }
    counts
}
