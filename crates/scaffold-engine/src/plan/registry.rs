//! Per-ecosystem dependency registry
//!
//! Names are compared case-insensitively and the first registration of a name
//! wins; later registrations of the same name are ignored.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Independent dependency universes tracked by a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
    /// Server-side (.NET) packages
    NuGet,
    /// Client-side (JavaScript) packages
    Npm,
}

impl Ecosystem {
    pub fn display_name(&self) -> &'static str {
        match self {
            Ecosystem::NuGet => "NuGet",
            Ecosystem::Npm => "npm",
        }
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Version used when a package is registered by name only
pub const WILDCARD_VERSION: &str = "*";

fn wildcard_version() -> String {
    WILDCARD_VERSION.to_string()
}

/// A package pinned by name and version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageReference {
    pub name: String,
    #[serde(default = "wildcard_version")]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Development-only dependency (npm `devDependencies`)
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub dev: bool,
}

impl PackageReference {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            source: None,
            dev: false,
        }
    }

    /// Legacy name-only form, pinned to the wildcard version
    pub fn name_only(name: impl Into<String>) -> Self {
        Self::new(name, WILDCARD_VERSION)
    }

    pub fn dev(mut self) -> Self {
        self.dev = true;
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Who registered a fact on the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OriginKind {
    /// Contributed by a module from configuration choices
    System,
    /// Extra dependency picked by the user
    User,
}

/// Registering module and its priority
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Origin {
    pub module: &'static str,
    pub priority: i32,
    pub kind: OriginKind,
}

impl Origin {
    pub fn system(module: &'static str, priority: i32) -> Self {
        Self {
            module,
            priority,
            kind: OriginKind::System,
        }
    }

    pub fn user(module: &'static str, priority: i32) -> Self {
        Self {
            module,
            priority,
            kind: OriginKind::User,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEntry {
    pub reference: PackageReference,
    pub origin: Origin,
}

/// Case-insensitive, first-write-wins name → reference map
#[derive(Debug, Clone)]
pub struct DependencyRegistry {
    ecosystem: Ecosystem,
    entries: Vec<DependencyEntry>,
    index: HashMap<String, usize>,
}

fn registry_key(name: &str) -> String {
    name.to_lowercase()
}

impl DependencyRegistry {
    pub fn new(ecosystem: Ecosystem) -> Self {
        Self {
            ecosystem,
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn ecosystem(&self) -> Ecosystem {
        self.ecosystem
    }

    /// Register a reference. Returns false (and changes nothing) when the name
    /// is already present under any casing.
    pub fn add(&mut self, reference: PackageReference, origin: Origin) -> bool {
        let key = registry_key(&reference.name);
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key, self.entries.len());
        self.entries.push(DependencyEntry { reference, origin });
        true
    }

    /// Legacy registration by name; synthesizes a wildcard version
    pub fn add_name(&mut self, name: &str, origin: Origin) -> bool {
        self.add(PackageReference::name_only(name), origin)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(&registry_key(name))
    }

    pub fn get(&self, name: &str) -> Option<&DependencyEntry> {
        self.index
            .get(&registry_key(name))
            .map(|&idx| &self.entries[idx])
    }

    /// Entries in first-registration order
    pub fn iter(&self) -> impl Iterator<Item = &DependencyEntry> {
        self.entries.iter()
    }

    pub fn references(&self) -> impl Iterator<Item = &PackageReference> {
        self.entries.iter().map(|e| &e.reference)
    }

    /// True when `name` was contributed by a module rather than the user
    pub fn is_system(&self, name: &str) -> bool {
        self.get(name)
            .is_some_and(|e| e.origin.kind == OriginKind::System)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
