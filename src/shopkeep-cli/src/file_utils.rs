//! Roll table files

use anyhow::{bail, Context, Result};
use shopkeep::RollTable;
use std::fs;
use std::path::Path;

/// Write a table as pretty JSON, creating parent directories
pub fn write_table(path: &Path, table: &RollTable) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(table).context("Failed to serialize table")?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}

/// Read a table file; ranges must be contiguous from 1 so every roll lands
pub fn read_table(path: &Path) -> Result<RollTable> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let table: RollTable = serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a roll table", path.display()))?;

    if !table.is_contiguous() {
        bail!(
            "{} has gaps or overlaps in its result ranges; regenerate it or fix the ranges",
            path.display()
        );
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopkeep::{ItemKind, ItemRecord, SequentialIds, TableBuilder, TableOptions};

    #[test]
    fn test_write_then_read() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("out").join("table.json");

        let items = [
            ItemRecord::new("a", "Rope", ItemKind::Equipment),
            ItemRecord::new("b", "Torch", ItemKind::Equipment),
        ];
        let refs: Vec<&ItemRecord> = items.iter().collect();
        let table = TableBuilder::default()
            .build(&refs, &TableOptions::new("Gear"), &mut SequentialIds::default())
            .unwrap();

        write_table(&path, &table).unwrap();
        assert_eq!(read_table(&path).unwrap(), table);
    }

    #[test]
    fn test_read_rejects_gapped_ranges() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("edited.json");

        let items = [
            ItemRecord::new("a", "Rope", ItemKind::Equipment),
            ItemRecord::new("b", "Torch", ItemKind::Equipment),
        ];
        let refs: Vec<&ItemRecord> = items.iter().collect();
        let mut table = TableBuilder::default()
            .build(&refs, &TableOptions::new("Gear"), &mut SequentialIds::default())
            .unwrap();
        table.results[1].range = [9, 12];
        write_table(&path, &table).unwrap();

        assert!(read_table(&path).is_err());
    }

    #[test]
    fn test_read_rejects_other_json() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("x.json");
        fs::write(&path, r#"{"hello": "world"}"#).unwrap();
        assert!(read_table(&path).is_err());
    }
}
