//! Conversion from the single-file `dictionary.json` to per-letter shards.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::{Context, Result};
use lexilens_core::preprocess::normalize_word;

use crate::sources::shard_path;

#[derive(Debug, Default, PartialEq)]
pub struct SplitSummary {
    /// Distinct keys written
    pub words: usize,
    /// Entries whose key normalizes to nothing
    pub skipped: usize,
    /// Entries dropped because an earlier key normalized to the same word
    pub collisions: usize,
}

/// Groups a flat word -> definition map by first letter.
///
/// Keys go through the same normalization as lookups, so a shard only holds
/// words a lookup can reach. When several keys collapse to one word, the
/// first in sorted order wins. Every letter gets a shard, possibly empty.
pub fn split_legacy(
    entries: HashMap<String, String>,
) -> (BTreeMap<char, BTreeMap<String, String>>, SplitSummary) {
    let mut shards: BTreeMap<char, BTreeMap<String, String>> =
        ('a'..='z').map(|c| (c, BTreeMap::new())).collect();
    let mut summary = SplitSummary::default();

    let sorted: BTreeMap<String, String> = entries.into_iter().collect();
    for (raw, definition) in sorted {
        let Some(word) = normalize_word(&raw) else {
            tracing::debug!("Skipping '{}'", raw);
            summary.skipped += 1;
            continue;
        };
        let Some(shard) = word.chars().next().and_then(|c| shards.get_mut(&c)) else {
            summary.skipped += 1;
            continue;
        };
        match shard.entry(word) {
            Entry::Vacant(slot) => {
                slot.insert(definition);
                summary.words += 1;
            }
            Entry::Occupied(slot) => {
                tracing::debug!("'{}' collides with '{}'", raw, slot.key());
                summary.collisions += 1;
            }
        }
    }

    (shards, summary)
}

/// Writes `<out_dir>/dict/<letter>.json` for every shard
pub fn write_shards(out_dir: &Path, shards: &BTreeMap<char, BTreeMap<String, String>>) -> Result<()> {
    std::fs::create_dir_all(out_dir.join("dict"))
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    for (letter, shard) in shards {
        let path = out_dir.join(shard_path(*letter));
        let json = serde_json::to_string(shard)?;
        std::fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
        tracing::debug!("Wrote {} ({} words)", path.display(), shard.len());
    }

    Ok(())
}
