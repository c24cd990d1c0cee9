//! The plan: file descriptors and dependency registries built by one composition run
//!
//! Modules write to the plan through `add_*` methods and read upstream facts
//! through `observe_*` methods. Observation only sees facts registered by
//! modules of a strictly lower priority than the module currently running.

pub mod registry;

pub use registry::{
    DependencyEntry, DependencyRegistry, Ecosystem, Origin, OriginKind, PackageReference,
    WILDCARD_VERSION,
};

use serde_json::Value;
use tracing::debug;

/// Where a planned file's content comes from
#[derive(Debug, Clone, PartialEq)]
pub enum FileSource {
    Literal(String),
    Template { template_id: String, model: Value },
}

/// A planned output file
#[derive(Debug, Clone, PartialEq)]
pub struct FileDescriptor {
    /// Relative, '/'-separated output path
    pub output_path: String,
    pub source: FileSource,
    pub origin: Origin,
}

impl FileDescriptor {
    pub fn is_template(&self) -> bool {
        matches!(self.source, FileSource::Template { .. })
    }

    pub fn template_id(&self) -> Option<&str> {
        match &self.source {
            FileSource::Template { template_id, .. } => Some(template_id),
            FileSource::Literal(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Stage {
    module: &'static str,
    priority: i32,
}

/// Mutable aggregate for one composition run
#[derive(Debug, Clone)]
pub struct Plan {
    files: Vec<FileDescriptor>,
    nuget: DependencyRegistry,
    npm: DependencyRegistry,
    stage: Stage,
}

impl Default for Plan {
    fn default() -> Self {
        Self::new()
    }
}

impl Plan {
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            nuget: DependencyRegistry::new(Ecosystem::NuGet),
            npm: DependencyRegistry::new(Ecosystem::Npm),
            stage: Stage {
                module: "<unstaged>",
                priority: i32::MIN,
            },
        }
    }

    /// Mark the module about to contribute. Called by the composer before each module.
    pub(crate) fn enter_stage(&mut self, module: &'static str, priority: i32) {
        self.stage = Stage { module, priority };
    }

    fn origin(&self, kind: OriginKind) -> Origin {
        Origin {
            module: self.stage.module,
            priority: self.stage.priority,
            kind,
        }
    }

    pub fn add_file(&mut self, output_path: impl Into<String>, content: impl Into<String>) {
        self.files.push(FileDescriptor {
            output_path: output_path.into(),
            source: FileSource::Literal(content.into()),
            origin: self.origin(OriginKind::System),
        });
    }

    pub fn add_template(
        &mut self,
        template_id: impl Into<String>,
        output_path: impl Into<String>,
        model: Value,
    ) {
        self.files.push(FileDescriptor {
            output_path: output_path.into(),
            source: FileSource::Template {
                template_id: template_id.into(),
                model,
            },
            origin: self.origin(OriginKind::System),
        });
    }

    /// Register a module-contributed dependency. Returns false if the name was already taken.
    pub fn add_dependency(&mut self, ecosystem: Ecosystem, reference: PackageReference) -> bool {
        let origin = self.origin(OriginKind::System);
        let added = self.registry_mut(ecosystem).add(reference, origin);
        if !added {
            debug!(module = origin.module, %ecosystem, "dependency already registered");
        }
        added
    }

    /// Legacy name-only registration (wildcard version)
    pub fn add_dependency_name(&mut self, ecosystem: Ecosystem, name: &str) -> bool {
        self.add_dependency(ecosystem, PackageReference::name_only(name))
    }

    /// Register a user-chosen dependency. Returns false if the name was already taken.
    pub fn add_user_dependency(&mut self, ecosystem: Ecosystem, reference: PackageReference) -> bool {
        let origin = self.origin(OriginKind::User);
        self.registry_mut(ecosystem).add(reference, origin)
    }

    fn registry_mut(&mut self, ecosystem: Ecosystem) -> &mut DependencyRegistry {
        match ecosystem {
            Ecosystem::NuGet => &mut self.nuget,
            Ecosystem::Npm => &mut self.npm,
        }
    }

    fn is_upstream(&self, origin: &Origin) -> bool {
        origin.priority < self.stage.priority
    }

    /// Whether a strictly-earlier module registered `name`
    pub fn observe_dependency(&self, ecosystem: Ecosystem, name: &str) -> bool {
        self.dependencies(ecosystem)
            .get(name)
            .is_some_and(|e| self.is_upstream(&e.origin))
    }

    /// Dependencies registered by strictly-earlier modules, in registration order
    pub fn observe_dependencies(&self, ecosystem: Ecosystem) -> Vec<&DependencyEntry> {
        self.dependencies(ecosystem)
            .iter()
            .filter(|e| self.is_upstream(&e.origin))
            .collect()
    }

    /// Files planned by strictly-earlier modules, in plan order
    pub fn observe_files(&self) -> impl Iterator<Item = &FileDescriptor> {
        self.files.iter().filter(|f| self.is_upstream(&f.origin))
    }

    /// All planned files in module execution order
    pub fn files(&self) -> &[FileDescriptor] {
        &self.files
    }

    pub fn dependencies(&self, ecosystem: Ecosystem) -> &DependencyRegistry {
        match ecosystem {
            Ecosystem::NuGet => &self.nuget,
            Ecosystem::Npm => &self.npm,
        }
    }

    pub fn has_dependency(&self, ecosystem: Ecosystem, name: &str) -> bool {
        self.dependencies(ecosystem).contains(name)
    }

    /// Case-insensitive lookup of a planned output path
    pub fn find_file(&self, output_path: &str) -> Option<&FileDescriptor> {
        let wanted = output_path.to_lowercase();
        self.files
            .iter()
            .find(|f| f.output_path.to_lowercase() == wanted)
    }

    pub fn output_paths(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|f| f.output_path.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_files_keep_insertion_order() {
        let mut plan = Plan::new();
        plan.enter_stage("core", 0);
        plan.add_file("README.md", "# App");
        plan.add_template("backend/Program.cs.jinja", "src/App.Api/Program.cs", json!({}));

        let paths: Vec<_> = plan.output_paths().collect();
        assert_eq!(paths, vec!["README.md", "src/App.Api/Program.cs"]);
        assert!(!plan.files()[0].is_template());
        assert_eq!(plan.files()[1].template_id(), Some("backend/Program.cs.jinja"));
        assert_eq!(plan.files()[1].origin.module, "core");
    }

    #[test]
    fn test_observe_only_sees_earlier_priorities() {
        let mut plan = Plan::new();
        plan.enter_stage("auth", 30);
        plan.add_dependency(Ecosystem::NuGet, PackageReference::new("JwtBearer", "9.0.0"));

        plan.enter_stage("peer", 30);
        assert!(!plan.observe_dependency(Ecosystem::NuGet, "jwtbearer"));
        assert!(plan.has_dependency(Ecosystem::NuGet, "jwtbearer"));

        plan.enter_stage("frontend", 70);
        assert!(plan.observe_dependency(Ecosystem::NuGet, "jwtbearer"));
        assert_eq!(plan.observe_dependencies(Ecosystem::NuGet).len(), 1);
    }

    #[test]
    fn test_observe_files_excludes_current_module() {
        let mut plan = Plan::new();
        plan.enter_stage("core", 0);
        plan.add_file("a.txt", "a");
        plan.enter_stage("manifests", 1000);
        plan.add_file("b.txt", "b");

        let seen: Vec<_> = plan.observe_files().map(|f| f.output_path.as_str()).collect();
        assert_eq!(seen, vec!["a.txt"]);
    }

    #[test]
    fn test_user_dependency_does_not_override_system() {
        let mut plan = Plan::new();
        plan.enter_stage("frontend", 70);
        plan.add_dependency(Ecosystem::Npm, PackageReference::new("vue", "^3.5.0"));
        plan.enter_stage("user-dependencies", 900);
        assert!(!plan.add_user_dependency(Ecosystem::Npm, PackageReference::new("Vue", "^2.0.0")));

        let entry = plan.dependencies(Ecosystem::Npm).get("vue").unwrap();
        assert_eq!(entry.reference.version, "^3.5.0");
        assert_eq!(entry.origin.kind, OriginKind::System);
    }

    #[test]
    fn test_find_file_is_case_insensitive() {
        let mut plan = Plan::new();
        plan.add_file("README.md", "# App");
        assert!(plan.find_file("readme.md").is_some());
        assert!(plan.find_file("docs/readme.md").is_none());
    }
}
