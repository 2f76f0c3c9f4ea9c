//! Configuration for Catalog API

use core_config::{AppInfo, FromEnv, app_info, cors::CorsConfig, env_or_default, server::ServerConfig};
use database::mongodb::MongoConfig;
use domain_catalog::{CatalogSettings, mongodb::DEFAULT_COLLECTION};

pub use core_config::Environment;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    /// Collection holding the product documents
    pub collection: String,
    pub catalog: CatalogSettings,
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let mongodb = MongoConfig::from_env()?;
        let catalog = CatalogSettings::from_env()?;
        let server = ServerConfig::from_env()?;
        let cors = CorsConfig::from_env()?;

        Ok(Self {
            app: app_info!(),
            mongodb,
            collection: env_or_default("CATALOG_COLLECTION", DEFAULT_COLLECTION),
            catalog,
            server,
            cors,
            environment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_config_defaults() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", Some("mongodb://localhost:27017")),
                ("MONGODB_DATABASE", Some("OrganStore")),
                ("MONGO_URL", None),
                ("CATALOG_COLLECTION", None),
                ("CATALOG_MAX_PAGE_LIMIT", None),
                ("CATALOG_QUERY_TIMEOUT_MS", None),
                ("PORT", None),
                ("HOST", None),
                ("CORS_ALLOWED_ORIGIN", None),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.app.name, "catalog_api");
                assert_eq!(config.mongodb.database(), "OrganStore");
                assert_eq!(config.collection, "Products");
                assert_eq!(config.server.port, 4000);
                assert_eq!(config.cors.allowed_origins, ["http://localhost:5173"]);
                assert_eq!(config.catalog.max_page_limit, None);
                assert_eq!(config.catalog.query_timeout, Duration::from_secs(10));
            },
        );
    }

    #[test]
    fn test_config_from_atlas_credentials() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", None),
                ("MONGO_URL", None),
                ("DB_USER", Some("organ")),
                ("DB_PASS", Some("p@ss")),
                ("MONGODB_HOST", Some("cluster0.example.mongodb.net")),
                ("MONGODB_DATABASE", Some("OrganStore")),
                ("CATALOG_COLLECTION", Some("Inventory")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert!(config.mongodb.url().starts_with("mongodb+srv://organ:p%40ss@"));
                assert_eq!(config.collection, "Inventory");
            },
        );
    }

    #[test]
    fn test_config_requires_mongodb() {
        temp_env::with_vars_unset(
            [
                "MONGODB_URL",
                "MONGO_URL",
                "DB_USER",
                "DB_PASS",
                "MONGODB_HOST",
            ],
            || {
                assert!(Config::from_env().is_err());
            },
        );
    }
}
