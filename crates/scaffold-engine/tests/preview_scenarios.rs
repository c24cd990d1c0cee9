use scaffold_engine::config::{
    ArchitectureStyle, BackendUnitTestFramework, CacheProvider, FrontendE2eFramework,
};
use scaffold_engine::tree::{find_by_path, flatten};
use scaffold_engine::{
    presets, Configuration, DebounceSettings, Ecosystem, EngineSettings, PackageReference,
    PreviewService, PreviewSession, SessionEvent,
};
use std::collections::BTreeSet;
use std::sync::Arc;

fn service() -> PreviewService {
    EngineSettings::default().preview_service().unwrap()
}

fn nuget_names(service: &PreviewService, config: &Configuration) -> BTreeSet<String> {
    let plan = service.compose(config).unwrap();
    plan.dependencies(Ecosystem::NuGet)
        .references()
        .map(|r| r.name.clone())
        .collect()
}

fn planned_paths(service: &PreviewService, config: &Configuration) -> BTreeSet<String> {
    flatten(&service.preview_tree(config).unwrap())
        .into_iter()
        .collect()
}

#[test]
fn test_every_preset_renders_identically_twice() {
    let service = service();
    for preset in presets::all() {
        let first = service.render(&preset.config).unwrap();
        let second = service.render(&preset.config).unwrap();
        assert_eq!(first, second, "preset {} is not deterministic", preset.id);
    }
}

#[test]
fn test_tree_lists_exactly_the_rendered_files() {
    let service = service();
    let mut config = presets::default_preset().config;
    config.backend.unit_test_framework = BackendUnitTestFramework::XUnit;
    config.frontend.e2e_framework = FrontendE2eFramework::Playwright;

    let rendered: BTreeSet<String> = service.render(&config).unwrap().into_keys().collect();
    assert_eq!(planned_paths(&service, &config), rendered);
}

#[test]
fn test_minimal_configuration_has_no_optional_features() {
    let service = service();
    let config = Configuration::minimal("Shop");
    let paths = planned_paths(&service, &config);

    assert!(paths.contains("src/Shop.Api/Program.cs"));
    assert!(paths.contains("src/Shop.Web/package.json"));
    assert!(paths.contains("Shop.slnx"));
    for path in &paths {
        assert!(!path.contains("Jwt"), "unexpected auth file {}", path);
        assert!(!path.contains("Swagger"), "unexpected api docs file {}", path);
        assert!(!path.contains("CacheSetup") && !path.contains("Redis"), "unexpected cache file {}", path);
        assert!(!path.starts_with("tests/"), "unexpected test project {}", path);
    }

    let program = service
        .preview_file(&config, "src/Shop.Api/Program.cs")
        .unwrap()
        .unwrap();
    assert!(!program.content.contains("AddJwt"));
    assert!(!program.content.contains("Swagger"));
}

#[test]
fn test_switching_cache_to_redis() {
    let service = service();
    let mut memory = presets::default_preset().config;
    memory.backend.cache = CacheProvider::MemoryCache;
    let mut redis = memory.clone();
    redis.backend.cache = CacheProvider::Redis;

    let before = nuget_names(&service, &memory);
    let after = nuget_names(&service, &redis);
    let added: Vec<_> = after.difference(&before).collect();
    assert_eq!(added, vec!["StackExchange.Redis"]);
    assert!(before.is_subset(&after));

    let memory_paths = planned_paths(&service, &memory);
    let redis_paths = planned_paths(&service, &redis);
    let removed: Vec<_> = memory_paths.difference(&redis_paths).collect();
    let introduced: Vec<_> = redis_paths.difference(&memory_paths).collect();
    assert_eq!(removed, vec!["src/MyApp.Api/Extensions/MemoryCacheSetup.cs"]);
    assert_eq!(introduced, vec!["src/MyApp.Api/Extensions/RedisSetup.cs"]);
}

#[test]
fn test_preview_lookup_ignores_case() {
    let service = service();
    let config = Configuration::default();
    let lower = service.preview_file(&config, "readme.md").unwrap().unwrap();
    let exact = service.preview_file(&config, "README.md").unwrap().unwrap();
    assert_eq!(lower, exact);
    assert!(service
        .preview_file(&config, "src/MyApp.Api/Nope.cs")
        .unwrap()
        .is_none());
}

#[test]
fn test_user_dependency_reaches_manifests() {
    let service = service();
    let config = Configuration::minimal("Shop");
    let proposal = service
        .propose_dependency(&config, Ecosystem::NuGet, PackageReference::new("Serilog", "4.1.0"))
        .unwrap();
    let scaffold_engine::DependencyProposal::Accepted(config) = proposal else {
        panic!("Serilog should be accepted");
    };

    let props = service
        .preview_file(&config, "Directory.Packages.props")
        .unwrap()
        .unwrap();
    assert!(props.content.contains(r#"Include="Serilog" Version="4.1.0""#));
    let csproj = service
        .preview_file(&config, "src/Shop.Api/Shop.Api.csproj")
        .unwrap()
        .unwrap();
    assert!(csproj.content.contains(r#"Include="Serilog""#));
}

#[test]
fn test_package_json_is_valid_json() {
    let service = service();
    let mut config = Configuration::minimal("Shop.Portal");
    config.frontend.e2e_framework = FrontendE2eFramework::Cypress;

    let file = service
        .preview_file(&config, "src/Shop.Portal.Web/package.json")
        .unwrap()
        .unwrap();
    let package: serde_json::Value = serde_json::from_str(&file.content).unwrap();
    assert_eq!(package["name"], "shop-portal");
    assert_eq!(package["dependencies"]["vue"], "^3.5.0");
    assert_eq!(package["devDependencies"]["cypress"], "^13.0.0");
    assert!(package["dependencies"].get("cypress").is_none());
    assert_eq!(package["scripts"]["test:e2e"], "cypress run");
}

#[test]
fn test_clean_architecture_projects_in_solution() {
    let service = service();
    let mut config = Configuration::minimal("Shop");
    config.backend.architecture = ArchitectureStyle::CleanArchitecture;

    let solution = service.preview_file(&config, "Shop.slnx").unwrap().unwrap();
    assert_eq!(solution.language, "xml");
    for layer in ["Api", "Domain", "Application", "Infrastructure"] {
        let project = format!("src/Shop.{}/Shop.{}.csproj", layer, layer);
        assert!(solution.content.contains(&project), "missing {}", project);
    }

    let readme = service.preview_file(&config, "README.md").unwrap().unwrap();
    assert!(readme.content.contains("| Architecture | CleanArchitecture |"));
}

#[tokio::test(start_paused = true)]
async fn test_session_against_real_service() {
    let backend = Arc::new(service());
    let (handle, mut events, _task) = PreviewSession::spawn(
        backend,
        Configuration::minimal("Shop"),
        DebounceSettings::default(),
    );

    let tree = match events.recv().await {
        Some(SessionEvent::TreeUpdated(tree)) => tree,
        other => panic!("expected a tree, got {:?}", other),
    };
    let readme = find_by_path(&tree, "README.md").unwrap().clone();
    assert!(handle.select(readme));

    match events.recv().await {
        Some(SessionEvent::ContentShown(file)) => {
            assert_eq!(file.output_path, "README.md");
            assert!(file.content.contains("# Shop"));
        }
        other => panic!("expected content, got {:?}", other),
    }

    let mut with_redis = Configuration::minimal("Shop");
    with_redis.backend.cache = CacheProvider::Redis;
    assert!(handle.edit(with_redis));

    let mut saw_tree = false;
    while let Some(event) = events.recv().await {
        match event {
            SessionEvent::TreeUpdated(tree) => {
                saw_tree = true;
                assert!(find_by_path(&tree, "src/Shop.Api/Extensions/RedisSetup.cs").is_some());
            }
            SessionEvent::ContentShown(file) => {
                assert_eq!(file.output_path, "README.md");
                assert!(file.content.contains("Redis"));
                break;
            }
            other => panic!("unexpected event {:?}", other),
        }
    }
    assert!(saw_tree);
}
