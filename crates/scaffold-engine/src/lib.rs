//! Scaffold Engine - plan composition and live preview for full-stack project scaffolds
//!
//! A [`Configuration`] describes an ASP.NET Core backend plus a Vue frontend.
//! Contribution modules turn it into a [`Plan`] of output files and package
//! dependencies, which is rendered through cached templates and exposed as a
//! file tree and per-file previews.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Composition** - `ContributionModule` implementations run in priority
//!   order against a shared `Plan` (`composer`, `modules`, `plan`, `ui_kit`)
//! - **Layer 2: Rendering** - template stores, the parsed-template cache and
//!   `render_plan` (`templates`, `render`, `archive`)
//! - **Layer 3: Preview** - `PreviewService` for trees and file content, plus the
//!   debounced selection tracker and its async session driver (`preview`, `selection`)
//!
//! # Example Usage
//!
//! ```ignore
//! use scaffold_engine::{presets, EngineSettings};
//!
//! let service = EngineSettings::load(None)?.preview_service()?;
//! let config = presets::default_preset().config;
//! let tree = service.preview_tree(&config)?;
//! let readme = service.preview_file(&config, "README.md")?;
//! ```

pub mod archive;
pub mod composer;
pub mod config;
pub mod error;
pub mod logging;
pub mod modules;
pub mod plan;
pub mod preview;
pub mod render;
pub mod selection;
pub mod settings;
pub mod templates;
pub mod tree;
pub mod ui_kit;

// Re-export main types for convenience
pub use composer::PlanComposer;
pub use config::{presets, Configuration};
pub use error::{Result, ScaffoldError};
pub use modules::ContributionModule;
pub use plan::{Ecosystem, FileDescriptor, PackageReference, Plan};
pub use preview::{DependencyProposal, PreviewService, PreviewedFile};
pub use render::{render_plan, RenderedOutput};
pub use selection::session::{PreviewBackend, PreviewSession, SessionCommand, SessionEvent, SessionHandle};
pub use selection::{DebounceSettings, SelectionTracker};
pub use settings::EngineSettings;
pub use templates::{TemplateCache, TemplateStore};
pub use tree::TreeNode;
pub use ui_kit::{UiKitProvider, UiKitRegistry};
