//! Installer core types.

use std::collections::HashMap;

/// Ordered list of package names to ensure. Duplicates are kept and reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageTable {
    packages: Vec<String>,
}

/// A package name that appears more than once in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duplicate {
    pub name: String,
    /// Zero-based positions of every occurrence.
    pub positions: Vec<usize>,
}

impl PackageTable {
    pub fn new(packages: Vec<String>) -> Self {
        Self { packages }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.packages.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Names listed more than once, in order of first appearance.
    pub fn duplicates(&self) -> Vec<Duplicate> {
        let mut positions: HashMap<&str, Vec<usize>> = HashMap::new();
        let mut order = Vec::new();
        for (i, name) in self.packages.iter().enumerate() {
            let entry = positions.entry(name.as_str()).or_default();
            if entry.is_empty() {
                order.push(name.as_str());
            }
            entry.push(i);
        }

        order
            .into_iter()
            .filter_map(|name| {
                let pos = positions.remove(name)?;
                (pos.len() > 1).then(|| Duplicate {
                    name: name.to_string(),
                    positions: pos,
                })
            })
            .collect()
    }
}

/// What happened to one table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageOutcome {
    AlreadyInstalled,
    Installed,
    /// Dry run: missing, would have been installed.
    WouldInstall,
    Failed,
}

/// Per-package outcomes in table order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    pub entries: Vec<(String, PackageOutcome)>,
}

impl InstallReport {
    pub fn failed(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, o)| *o == PackageOutcome::Failed)
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn count(&self, outcome: &PackageOutcome) -> usize {
        self.entries.iter().filter(|(_, o)| o == outcome).count()
    }
}
