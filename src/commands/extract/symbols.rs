use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Symbols recognized in extracted math text. Each maps to itself today; the
/// table exists so canonicalizations can be added as data.
const BUILTIN_SYMBOLS: &[&str] = &[
    "×", "÷", "√", "π", "α", "β", "γ", "δ", "ε", "θ", "λ", "μ", "σ", "φ", "ω", "∞", "≤", "≥", "≠",
    "≈", "±", "∑", "∏", "∫", "∂", "∆", "→", "←", "↑", "↓", "↔", "∈", "∉", "⊂", "⊃", "∪", "∩", "∅",
    "∀", "∃", "∴", "∵", "∠", "⊥", "∥", "°", "′", "″", "‴", "⁰", "¹", "²", "³", "⁴", "⁵", "⁶", "⁷",
    "⁸", "⁹", "⁻", "⁺", "⁽", "⁾", "₀", "₁", "₂", "₃", "₄", "₅", "₆", "₇", "₈", "₉", "₋", "₊", "₍",
    "₎",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolEntry {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone)]
pub struct SymbolTable {
    entries: Vec<SymbolEntry>,
    source: String,
}

impl SymbolTable {
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_SYMBOLS
                .iter()
                .map(|symbol| SymbolEntry {
                    from: (*symbol).to_string(),
                    to: (*symbol).to_string(),
                })
                .collect(),
            source: "builtin".to_string(),
        }
    }

    pub fn from_entries(entries: Vec<SymbolEntry>, source: impl Into<String>) -> Result<Self> {
        let mut seen = HashSet::new();
        for (index, entry) in entries.iter().enumerate() {
            if entry.from.is_empty() {
                bail!("symbol entry {index} has an empty 'from' value");
            }
            if !seen.insert(entry.from.as_str()) {
                bail!("symbol entry {index} repeats 'from' value {:?}", entry.from);
            }
        }

        let table = Self {
            entries,
            source: source.into(),
        };
        for (from, to) in table.chained_pairs() {
            warn!(
                from = %from,
                to = %to,
                "symbol replacement produces another table key; result depends on table order"
            );
        }

        Ok(table)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let entries: Vec<SymbolEntry> = serde_json::from_slice(&raw)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        let table = Self::from_entries(entries, path.display().to_string())
            .with_context(|| format!("invalid symbol table {}", path.display()))?;

        info!(path = %path.display(), entries = table.len(), "loaded symbol table");
        Ok(table)
    }

    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::builtin()),
        }
    }

    pub fn entries(&self) -> &[SymbolEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn apply(&self, text: &str) -> String {
        let mut output = text.to_string();
        for entry in &self.entries {
            if entry.from == entry.to || !output.contains(entry.from.as_str()) {
                continue;
            }
            output = output.replace(entry.from.as_str(), &entry.to);
        }
        output
    }

    fn chained_pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs = Vec::new();
        for entry in &self.entries {
            if entry.from == entry.to {
                continue;
            }
            let chained = self
                .entries
                .iter()
                .any(|other| other.from != entry.from && entry.to.contains(other.from.as_str()));
            if chained {
                pairs.push((entry.from.as_str(), entry.to.as_str()));
            }
        }
        pairs
    }
}
