use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

/// Semantic grouping of categories, used for the stats overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    GraphicCore,
    StyleMatrix,
    Atmosphere,
}

impl Tier {
    pub fn label(self) -> &'static str {
        match self {
            Tier::GraphicCore => "Graphic Core",
            Tier::StyleMatrix => "Style Matrix",
            Tier::Atmosphere => "Atmosphere",
        }
    }
}

#[derive(Debug)]
pub struct CategorySpec {
    pub name: &'static str,
    pub path: &'static str,
    pub tier: Tier,
}

/// The closed category set. The storage paths are legacy and must stay
/// stable, or existing word lists orphan.
pub const CATEGORIES: &[CategorySpec] = &[
    CategorySpec {
        name: "Subject",
        path: "data/graphic/subjects.txt",
        tier: Tier::GraphicCore,
    },
    CategorySpec {
        name: "Action",
        path: "data/graphic/actions.txt",
        tier: Tier::GraphicCore,
    },
    CategorySpec {
        name: "Lighting",
        path: "data/graphic/lighting.txt",
        tier: Tier::GraphicCore,
    },
    CategorySpec {
        name: "LensLanguage",
        path: "data/graphic/lens_language.txt",
        tier: Tier::GraphicCore,
    },
    CategorySpec {
        name: "Reference",
        path: "data/graphic/styles_reference.txt",
        tier: Tier::StyleMatrix,
    },
    CategorySpec {
        name: "Color",
        path: "data/graphic/styles_color.txt",
        tier: Tier::StyleMatrix,
    },
    CategorySpec {
        name: "Scene",
        path: "data/graphic/styles_scene.txt",
        tier: Tier::StyleMatrix,
    },
    CategorySpec {
        name: "Composition",
        path: "data/graphic/styles_composition.txt",
        tier: Tier::StyleMatrix,
    },
    CategorySpec {
        name: "Elements",
        path: "data/graphic/styles_elements.txt",
        tier: Tier::StyleMatrix,
    },
    CategorySpec {
        name: "LookLike",
        path: "data/graphic/styles_lookLike.txt",
        tier: Tier::StyleMatrix,
    },
    CategorySpec {
        name: "Mood",
        path: "data/common/moods.txt",
        tier: Tier::Atmosphere,
    },
    CategorySpec {
        name: "Usage",
        path: "data/common/usage.txt",
        tier: Tier::Atmosphere,
    },
];

/// The order in which the assembler draws one keyword per category.
pub const ASSEMBLY_ORDER: &[&str] = &[
    "Subject",
    "Reference",
    "Scene",
    "Action",
    "Lighting",
    "LensLanguage",
    "Elements",
    "Composition",
    "Color",
    "Mood",
    "Usage",
    "LookLike",
];

pub fn category(name: &str) -> Option<&'static CategorySpec> {
    CATEGORIES.iter().find(|spec| spec.name == name)
}

pub fn category_names() -> impl Iterator<Item = &'static str> {
    CATEGORIES.iter().map(|spec| spec.name)
}

/// Clean a single line from a word-list file.
///
/// Returns `None` for blank lines; otherwise the trimmed keyword.
pub fn parse_word_line(line: &str) -> Option<String> {
    let cleaned = line.trim();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

/// Read a word-list file: one keyword per line, blank lines skipped.
/// A missing file is an empty list, never an error.
pub fn read_words(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "Word list file missing, starting empty");
        return Ok(Vec::new());
    }
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(content.lines().filter_map(parse_word_line).collect())
}

/// Overwrite a word-list file with exactly one keyword per line.
pub fn write_words(path: &Path, words: &[String]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let body = words
        .iter()
        .filter_map(|w| parse_word_line(w))
        .collect::<Vec<_>>()
        .join("\n");
    fs::write(path, body).with_context(|| format!("writing {}", path.display()))?;
    tracing::trace!(path = %path.display(), count = words.len(), "Wrote word list");
    Ok(())
}

/// The keyword warehouse: one ordered word list per category, loaded on
/// demand from flat text files under a data root and cached in memory.
///
/// The cache is the source of truth for the rest of the session; every
/// mutation is immediately persisted to the local file so the two never
/// diverge.
pub struct Warehouse {
    root: PathBuf,
    cache: HashMap<&'static str, Vec<String>>,
}

impl Warehouse {
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: HashMap::new(),
        }
    }

    fn spec(&self, name: &str) -> Result<&'static CategorySpec> {
        category(name).ok_or_else(|| anyhow!("unknown category: {name}"))
    }

    fn file_path(&self, spec: &CategorySpec) -> PathBuf {
        self.root.join(spec.path)
    }

    /// Return the word list for a category, reading the backing file on
    /// first access.
    pub fn load(&mut self, name: &str) -> Result<&[String]> {
        let spec = self.spec(name)?;
        if !self.cache.contains_key(spec.name) {
            let words = read_words(&self.file_path(spec))?;
            tracing::debug!(category = spec.name, count = words.len(), "Loaded word list");
            self.cache.insert(spec.name, words);
        }
        Ok(self.cache.get(spec.name).map(Vec::as_slice).unwrap_or(&[]))
    }

    /// Append a keyword and persist. Returns `false` without touching the
    /// list when the keyword is empty after trimming or already present
    /// (case-sensitive exact match).
    pub fn add(&mut self, name: &str, keyword: &str) -> Result<bool> {
        let keyword = match parse_word_line(keyword) {
            Some(k) => k,
            None => {
                tracing::trace!(category = name, "Ignoring empty keyword");
                return Ok(false);
            }
        };
        self.load(name)?;
        let spec = self.spec(name)?;
        let words = self.cache.get_mut(spec.name).expect("loaded above");
        if words.iter().any(|w| w == &keyword) {
            tracing::trace!(category = name, keyword = %keyword, "Keyword already present");
            return Ok(false);
        }
        words.push(keyword);
        self.save(name)?;
        Ok(true)
    }

    /// Remove a keyword by exact match and persist. Returns `false` when
    /// the keyword was not in the list.
    pub fn remove(&mut self, name: &str, keyword: &str) -> Result<bool> {
        self.load(name)?;
        let spec = self.spec(name)?;
        let words = self.cache.get_mut(spec.name).expect("loaded above");
        let before = words.len();
        words.retain(|w| w != keyword);
        if words.len() == before {
            tracing::trace!(category = name, keyword = %keyword, "Keyword not found");
            return Ok(false);
        }
        self.save(name)?;
        Ok(true)
    }

    /// Rewrite the local file for a category from the cached list.
    pub fn save(&mut self, name: &str) -> Result<()> {
        let spec = self.spec(name)?;
        let words = self.cache.get(spec.name).cloned().unwrap_or_default();
        write_words(&self.file_path(spec), &words)
    }

    /// Replace a category's word list wholesale and persist. Used by the
    /// ingest import path.
    pub fn replace(&mut self, name: &str, words: Vec<String>) -> Result<()> {
        let spec = self.spec(name)?;
        self.cache.insert(spec.name, words);
        self.save(name)
    }

    /// Keyword counts per category, in table order.
    pub fn counts(&mut self) -> Result<Vec<(&'static CategorySpec, usize)>> {
        let mut out = Vec::with_capacity(CATEGORIES.len());
        for spec in CATEGORIES {
            let len = self.load(spec.name)?.len();
            out.push((spec, len));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_word_line_trims() {
        assert_eq!(parse_word_line("  neon rain \n"), Some("neon rain".to_string()));
        assert_eq!(parse_word_line("   "), None);
        assert_eq!(parse_word_line(""), None);
    }

    #[test]
    fn assembly_order_covers_every_category_once() {
        assert_eq!(ASSEMBLY_ORDER.len(), CATEGORIES.len());
        for name in ASSEMBLY_ORDER {
            assert!(category(name).is_some(), "{name} missing from table");
        }
    }

    #[test]
    fn category_lookup_is_exact() {
        assert!(category("Mood").is_some());
        assert!(category("mood").is_none());
        assert!(category("Texture").is_none());
    }
}
