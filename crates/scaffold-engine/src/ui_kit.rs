//! UI-kit providers
//!
//! Each supported component library is a [`UiKitProvider`]: the npm packages it
//! needs, the template used for the web app entry point (`src/main.ts`) and any
//! extra files it ships (Tailwind config, component manifests, layouts).
//! The frontend module looks providers up by the configured [`UiLibrary`].

use crate::config::UiLibrary;
use crate::error::{Result, ScaffoldError};
use crate::plan::PackageReference;
use std::sync::Arc;

/// An extra file shipped by a UI kit, relative to the web project root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateMapping {
    pub template_id: &'static str,
    pub output_path: &'static str,
}

impl TemplateMapping {
    pub const fn new(template_id: &'static str, output_path: &'static str) -> Self {
        Self {
            template_id,
            output_path,
        }
    }
}

/// Integration of one frontend component library
pub trait UiKitProvider: Send + Sync {
    fn library(&self) -> UiLibrary;

    /// npm packages the kit needs on top of the base web stack
    fn dependencies(&self) -> Vec<PackageReference>;

    /// Template rendered to `src/main.ts`
    fn entry_template_id(&self) -> &'static str;

    fn extra_templates(&self) -> Vec<TemplateMapping> {
        Vec::new()
    }
}

const TAILWIND_CONFIGS: [TemplateMapping; 3] = [
    TemplateMapping::new("frontend/ui/tailwind/tailwind.config.js.jinja", "tailwind.config.js"),
    TemplateMapping::new("frontend/ui/tailwind/postcss.config.js.jinja", "postcss.config.js"),
    TemplateMapping::new("frontend/ui/tailwind/style.css.jinja", "src/style.css"),
];

pub struct ElementPlusKit;

impl UiKitProvider for ElementPlusKit {
    fn library(&self) -> UiLibrary {
        UiLibrary::ElementPlus
    }

    fn dependencies(&self) -> Vec<PackageReference> {
        vec![
            PackageReference::new("element-plus", "^2.5.0"),
            PackageReference::new("@element-plus/icons-vue", "^2.3.0"),
        ]
    }

    fn entry_template_id(&self) -> &'static str {
        "frontend/main.ts.jinja"
    }
}

pub struct AntDesignVueKit;

impl UiKitProvider for AntDesignVueKit {
    fn library(&self) -> UiLibrary {
        UiLibrary::AntDesignVue
    }

    fn dependencies(&self) -> Vec<PackageReference> {
        vec![
            PackageReference::new("ant-design-vue", "^4.2.0"),
            PackageReference::new("@ant-design/icons-vue", "^7.0.0"),
        ]
    }

    fn entry_template_id(&self) -> &'static str {
        "frontend/ui/antd/main.ts.jinja"
    }
}

pub struct NaiveUiKit;

impl UiKitProvider for NaiveUiKit {
    fn library(&self) -> UiLibrary {
        UiLibrary::NaiveUi
    }

    fn dependencies(&self) -> Vec<PackageReference> {
        vec![
            PackageReference::new("naive-ui", "^2.38.0"),
            PackageReference::new("@vicons/ionicons5", "^0.12.0"),
        ]
    }

    fn entry_template_id(&self) -> &'static str {
        "frontend/ui/naive/main.ts.jinja"
    }
}

pub struct TailwindHeadlessKit;

impl UiKitProvider for TailwindHeadlessKit {
    fn library(&self) -> UiLibrary {
        UiLibrary::TailwindHeadless
    }

    fn dependencies(&self) -> Vec<PackageReference> {
        vec![
            PackageReference::new("tailwindcss", "^3.4.0"),
            PackageReference::new("postcss", "^8.4.0"),
            PackageReference::new("autoprefixer", "^10.4.0"),
            PackageReference::new("@headlessui/vue", "^1.7.0"),
        ]
    }

    fn entry_template_id(&self) -> &'static str {
        "frontend/ui/tailwind/main.ts.jinja"
    }

    fn extra_templates(&self) -> Vec<TemplateMapping> {
        TAILWIND_CONFIGS.to_vec()
    }
}

pub struct ShadcnVueKit;

impl UiKitProvider for ShadcnVueKit {
    fn library(&self) -> UiLibrary {
        UiLibrary::ShadcnVue
    }

    fn dependencies(&self) -> Vec<PackageReference> {
        vec![
            PackageReference::new("tailwindcss", "^3.4.0").dev(),
            PackageReference::new("postcss", "^8.4.0").dev(),
            PackageReference::new("autoprefixer", "^10.4.0").dev(),
            PackageReference::new("class-variance-authority", "^0.7.0"),
            PackageReference::new("clsx", "^2.1.0"),
            PackageReference::new("tailwind-merge", "^2.2.0"),
            PackageReference::new("radix-vue", "^1.4.0"),
            PackageReference::new("lucide-vue-next", "^0.312.0"),
        ]
    }

    fn entry_template_id(&self) -> &'static str {
        "frontend/ui/shadcn/main.ts.jinja"
    }

    fn extra_templates(&self) -> Vec<TemplateMapping> {
        let mut extras = vec![TemplateMapping::new(
            "frontend/ui/shadcn/components.json.jinja",
            "components.json",
        )];
        extras.extend(TAILWIND_CONFIGS);
        extras
    }
}

pub struct MateChatKit;

impl UiKitProvider for MateChatKit {
    fn library(&self) -> UiLibrary {
        UiLibrary::MateChat
    }

    fn dependencies(&self) -> Vec<PackageReference> {
        vec![
            PackageReference::new("@matechat/core", "^0.1.0"),
            PackageReference::new("vue-devui", "^1.6.0"),
            PackageReference::new("@devui-design/icons", "^1.4.0"),
        ]
    }

    fn entry_template_id(&self) -> &'static str {
        "frontend/ui/matechat/main.ts.jinja"
    }

    fn extra_templates(&self) -> Vec<TemplateMapping> {
        vec![TemplateMapping::new(
            "frontend/ui/matechat/ChatLayout.vue.jinja",
            "src/components/ChatLayout.vue",
        )]
    }
}

/// Providers keyed by the library they integrate
#[derive(Clone, Default)]
pub struct UiKitRegistry {
    providers: Vec<Arc<dyn UiKitProvider>>,
}

impl UiKitRegistry {
    /// An empty registry; every lookup fails until providers are registered
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding a provider for every [`UiLibrary`] variant
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(ElementPlusKit));
        registry.register(Arc::new(AntDesignVueKit));
        registry.register(Arc::new(NaiveUiKit));
        registry.register(Arc::new(TailwindHeadlessKit));
        registry.register(Arc::new(ShadcnVueKit));
        registry.register(Arc::new(MateChatKit));
        registry
    }

    /// Register a provider, replacing any earlier one for the same library
    pub fn register(&mut self, provider: Arc<dyn UiKitProvider>) {
        self.providers.retain(|p| p.library() != provider.library());
        self.providers.push(provider);
    }

    pub fn lookup(&self, library: UiLibrary) -> Result<&dyn UiKitProvider> {
        self.providers
            .iter()
            .find(|p| p.library() == library)
            .map(|p| p.as_ref())
            .ok_or(ScaffoldError::UnsupportedUiKit(library))
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_LIBRARIES: [UiLibrary; 6] = [
        UiLibrary::ElementPlus,
        UiLibrary::AntDesignVue,
        UiLibrary::NaiveUi,
        UiLibrary::TailwindHeadless,
        UiLibrary::ShadcnVue,
        UiLibrary::MateChat,
    ];

    #[test]
    fn test_defaults_cover_every_library() {
        let registry = UiKitRegistry::with_defaults();
        for library in ALL_LIBRARIES {
            let provider = registry.lookup(library).unwrap();
            assert_eq!(provider.library(), library);
            assert!(!provider.dependencies().is_empty());
        }
    }

    #[test]
    fn test_empty_registry_rejects_lookup() {
        let err = UiKitRegistry::new().lookup(UiLibrary::MateChat).err().unwrap();
        assert!(matches!(err, ScaffoldError::UnsupportedUiKit(UiLibrary::MateChat)));
        assert!(err.is_module_failure());
    }

    #[test]
    fn test_register_replaces_same_library() {
        let mut registry = UiKitRegistry::with_defaults();
        registry.register(Arc::new(NaiveUiKit));
        assert_eq!(registry.len(), 6);
    }

    #[test]
    fn test_shadcn_extras_include_tailwind() {
        let outputs: Vec<_> = ShadcnVueKit
            .extra_templates()
            .iter()
            .map(|m| m.output_path)
            .collect();
        assert_eq!(
            outputs,
            vec![
                "components.json",
                "tailwind.config.js",
                "postcss.config.js",
                "src/style.css"
            ]
        );
    }
}
