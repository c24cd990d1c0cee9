use super::{model_with, ContributionModule};
use crate::config::{Configuration, DatabaseProvider, OrmProvider};
use crate::error::Result;
use crate::plan::{Ecosystem, PackageReference, Plan};
use serde_json::json;

const EF_CORE_VERSION: &str = "9.0.0";
const FREESQL_VERSION: &str = "3.2.833";

fn ef_core_provider(database: DatabaseProvider) -> PackageReference {
    match database {
        DatabaseProvider::Sqlite => {
            PackageReference::new("Microsoft.EntityFrameworkCore.Sqlite", EF_CORE_VERSION)
        }
        DatabaseProvider::MySql => PackageReference::new("Pomelo.EntityFrameworkCore.MySql", "9.0.0"),
        DatabaseProvider::SqlServer => {
            PackageReference::new("Microsoft.EntityFrameworkCore.SqlServer", EF_CORE_VERSION)
        }
    }
}

fn freesql_provider(database: DatabaseProvider) -> PackageReference {
    let name = match database {
        DatabaseProvider::Sqlite => "FreeSql.Provider.Sqlite",
        DatabaseProvider::MySql => "FreeSql.Provider.MySqlConnector",
        DatabaseProvider::SqlServer => "FreeSql.Provider.SqlServer",
    };
    PackageReference::new(name, FREESQL_VERSION)
}

/// NuGet packages required by the configured data-access strategy, engine
/// provider included where the strategy needs one.
pub fn orm_packages(config: &Configuration) -> Vec<PackageReference> {
    let database = config.backend.database;
    match config.backend.orm {
        OrmProvider::SqlSugar => vec![PackageReference::new("SqlSugarCore", "5.1.4.169")],
        OrmProvider::EfCore => vec![
            PackageReference::new("Microsoft.EntityFrameworkCore", EF_CORE_VERSION),
            PackageReference::new("Microsoft.EntityFrameworkCore.Design", EF_CORE_VERSION),
            ef_core_provider(database),
        ],
        OrmProvider::Dapper => vec![PackageReference::new("Dapper", "2.1.35")],
        OrmProvider::FreeSql => vec![
            PackageReference::new("FreeSql", FREESQL_VERSION),
            freesql_provider(database),
        ],
    }
}

/// Data-access setup. Branches on the ORM choice; EF Core and FreeSql also
/// branch on the database engine to pick a provider package.
pub struct StorageModule;

impl ContributionModule for StorageModule {
    fn name(&self) -> &'static str {
        "storage"
    }

    fn priority(&self) -> i32 {
        10
    }

    fn is_enabled(&self, _config: &Configuration) -> bool {
        true
    }

    fn contribute(&self, plan: &mut Plan, config: &Configuration) -> Result<()> {
        let api = config.api_root();
        let backend = &config.backend;
        let model = model_with(
            config,
            json!({
                "database": backend.database.name(),
                "connection_string": backend.database.connection_string(config.project_name()),
            }),
        );

        match backend.orm {
            OrmProvider::SqlSugar => {
                plan.add_template(
                    "backend/orm/sqlsugar/SqlSugarSetup.cs.jinja",
                    format!("{}/Extensions/SqlSugarSetup.cs", api),
                    model,
                );
            }
            OrmProvider::EfCore => {
                plan.add_template(
                    "backend/orm/efcore/DbContext.cs.jinja",
                    format!("{}/Data/{}DbContext.cs", api, config.project_name()),
                    model.clone(),
                );
                plan.add_template(
                    "backend/orm/efcore/EFCoreSetup.cs.jinja",
                    format!("{}/Setup/EFCoreSetup.cs", api),
                    model,
                );
            }
            OrmProvider::Dapper => {
                plan.add_template(
                    "backend/orm/dapper/DapperSetup.cs.jinja",
                    format!("{}/Setup/DapperSetup.cs", api),
                    model,
                );
            }
            OrmProvider::FreeSql => {
                plan.add_template(
                    "backend/orm/freesql/FreeSqlSetup.cs.jinja",
                    format!("{}/Setup/FreeSqlSetup.cs", api),
                    model,
                );
            }
        }

        for reference in orm_packages(config) {
            plan.add_dependency(Ecosystem::NuGet, reference);
        }
        Ok(())
    }
}
