//! Built-in configuration presets

use super::{
    ArchitectureStyle, BackendOptions, BasicOptions, CacheProvider, Configuration,
    DatabaseProvider, FrontendOptions, OrmProvider, RouterMode, UiLibrary,
};
use serde::Serialize;

/// A named, ready-to-use configuration
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub is_default: bool,
    pub tags: &'static [&'static str],
    pub config: Configuration,
}

struct PresetOptions {
    architecture: ArchitectureStyle,
    orm: OrmProvider,
    database: DatabaseProvider,
    cache: CacheProvider,
    jwt_auth: bool,
    ui_library: UiLibrary,
    router_mode: RouterMode,
    mock_data: bool,
}

fn preset_config(options: PresetOptions) -> Configuration {
    Configuration {
        basic: BasicOptions::default(),
        backend: BackendOptions {
            architecture: options.architecture,
            orm: options.orm,
            database: options.database,
            cache: options.cache,
            swagger: true,
            jwt_auth: options.jwt_auth,
            ..Default::default()
        },
        frontend: FrontendOptions {
            ui_library: options.ui_library,
            router_mode: options.router_mode,
            mock_data: options.mock_data,
            ..Default::default()
        },
    }
}

/// All built-in presets, in display order
pub fn all() -> Vec<Preset> {
    vec![
        Preset {
            id: "minimal",
            name: "Minimal",
            description: "Core features only",
            is_default: false,
            tags: &["lightweight", "quick-start"],
            config: preset_config(PresetOptions {
                architecture: ArchitectureStyle::Simple,
                orm: OrmProvider::SqlSugar,
                database: DatabaseProvider::Sqlite,
                cache: CacheProvider::None,
                jwt_auth: false,
                ui_library: UiLibrary::ElementPlus,
                router_mode: RouterMode::Hash,
                mock_data: false,
            }),
        },
        Preset {
            id: "standard",
            name: "Standard",
            description: "Sensible defaults for most projects",
            is_default: true,
            tags: &["recommended"],
            config: preset_config(PresetOptions {
                architecture: ArchitectureStyle::Simple,
                orm: OrmProvider::SqlSugar,
                database: DatabaseProvider::Sqlite,
                cache: CacheProvider::MemoryCache,
                jwt_auth: true,
                ui_library: UiLibrary::ElementPlus,
                router_mode: RouterMode::Hash,
                mock_data: false,
            }),
        },
        Preset {
            id: "enterprise",
            name: "Enterprise",
            description: "Clean Architecture with EF Core, MySQL and Redis",
            is_default: false,
            tags: &["full-featured", "production", "clean-architecture"],
            config: preset_config(PresetOptions {
                architecture: ArchitectureStyle::CleanArchitecture,
                orm: OrmProvider::EfCore,
                database: DatabaseProvider::MySql,
                cache: CacheProvider::Redis,
                jwt_auth: true,
                ui_library: UiLibrary::ElementPlus,
                router_mode: RouterMode::History,
                mock_data: false,
            }),
        },
        Preset {
            id: "startup",
            name: "Startup",
            description: "Simple layout with SqlSugar and Naive UI",
            is_default: false,
            tags: &["startup", "quick-start", "naive-ui"],
            config: preset_config(PresetOptions {
                architecture: ArchitectureStyle::Simple,
                orm: OrmProvider::SqlSugar,
                database: DatabaseProvider::Sqlite,
                cache: CacheProvider::MemoryCache,
                jwt_auth: false,
                ui_library: UiLibrary::NaiveUi,
                router_mode: RouterMode::Hash,
                mock_data: true,
            }),
        },
        Preset {
            id: "ai-ready",
            name: "AI Ready",
            description: "Chat application shell built on MateChat",
            is_default: false,
            tags: &["ai", "chat", "matechat"],
            config: preset_config(PresetOptions {
                architecture: ArchitectureStyle::Simple,
                orm: OrmProvider::SqlSugar,
                database: DatabaseProvider::Sqlite,
                cache: CacheProvider::MemoryCache,
                jwt_auth: true,
                ui_library: UiLibrary::MateChat,
                router_mode: RouterMode::Hash,
                mock_data: false,
            }),
        },
    ]
}

/// Look up a preset by id (case-insensitive)
pub fn find(id: &str) -> Option<Preset> {
    all().into_iter().find(|p| p.id.eq_ignore_ascii_case(id))
}

/// The preset marked as default
pub fn default_preset() -> Preset {
    all()
        .into_iter()
        .find(|p| p.is_default)
        .unwrap_or_else(|| Preset {
            id: "default",
            name: "Default",
            description: "Engine defaults",
            is_default: true,
            tags: &[],
            config: Configuration::default(),
        })
}
