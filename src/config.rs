use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_TASKS_URL: &str = "https://6710fa904eca2acdb5f30afb.mockapi.io/tasks";
pub const DEFAULT_ITEMS_URL: &str = "https://6710fa904eca2acdb5f30afb.mockapi.io/tasks2";
pub const DEFAULT_CART_URL: &str = "https://67126da56c5f5ced66237d06.mockapi.io/cart";
pub const DEFAULT_SHOPS_URL: &str = "https://67126da56c5f5ced66237d06.mockapi.io/shops";
pub const DEFAULT_DRINKS_URL: &str = "https://6710fa904eca2acdb5f30afb.mockapi.io/drinks";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} is not a valid resource url: {value}")]
    InvalidUrl { key: String, value: String },

    #[error("{key} is not a valid socket address: {value}")]
    InvalidAddr { key: String, value: String },
}

/// Where one REST collection lives: `{base_url}/{resource_path}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceConfig {
    pub base_url: String,
    pub resource_path: String,
}

impl ResourceConfig {
    pub fn new(base_url: impl Into<String>, resource_path: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let resource_path = resource_path.into().trim_matches('/').to_string();
        Self { base_url, resource_path }
    }

    /// Splits a full collection url on its last path segment.
    pub fn from_url(url: &str) -> Option<Self> {
        let trimmed = url.trim().trim_end_matches('/');
        let (base, path) = trimmed.rsplit_once('/')?;
        if path.is_empty() || !base.contains("://") || base.ends_with('/') {
            return None;
        }
        Some(Self::new(base, path))
    }

    pub fn collection_url(&self) -> String {
        format!("{}/{}", self.base_url, self.resource_path)
    }
}

/// Resources consumed by the three apps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppsConfig {
    pub tasks: ResourceConfig,
    pub items: ResourceConfig,
    pub cart: ResourceConfig,
    pub shops: ResourceConfig,
    pub drinks: ResourceConfig,
}

impl Default for AppsConfig {
    fn default() -> Self {
        Self {
            tasks: default_resource(DEFAULT_TASKS_URL, "tasks"),
            items: default_resource(DEFAULT_ITEMS_URL, "tasks2"),
            cart: default_resource(DEFAULT_CART_URL, "cart"),
            shops: default_resource(DEFAULT_SHOPS_URL, "shops"),
            drinks: default_resource(DEFAULT_DRINKS_URL, "drinks"),
        }
    }
}

impl AppsConfig {
    /// Every resource under one base url, e.g. a locally running mock backend.
    pub fn local(base_url: &str) -> Self {
        Self {
            tasks: ResourceConfig::new(base_url, "tasks"),
            items: ResourceConfig::new(base_url, "items"),
            cart: ResourceConfig::new(base_url, "cart"),
            shops: ResourceConfig::new(base_url, "shops"),
            drinks: ResourceConfig::new(base_url, "drinks"),
        }
    }

    /// Reads `.env` if present, then the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::new_from_env()
    }

    pub fn new_from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            tasks: resource_from_var(&lookup, "CRUDFLOW_TASKS_URL", defaults.tasks)?,
            items: resource_from_var(&lookup, "CRUDFLOW_ITEMS_URL", defaults.items)?,
            cart: resource_from_var(&lookup, "CRUDFLOW_CART_URL", defaults.cart)?,
            shops: resource_from_var(&lookup, "CRUDFLOW_SHOPS_URL", defaults.shops)?,
            drinks: resource_from_var(&lookup, "CRUDFLOW_DRINKS_URL", defaults.drinks)?,
        })
    }
}

/// Mock backend settings.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub database_url: String,
    pub addr: SocketAddr,
    pub seed_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            seed_path: None,
        }
    }
}

impl ServerConfig {
    pub fn new_from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let database_url = env::var("DATABASE_URL").unwrap_or(defaults.database_url);

        let addr = match env::var("CRUDFLOW_ADDR") {
            Ok(value) => value.parse().map_err(|_| ConfigError::InvalidAddr {
                key: "CRUDFLOW_ADDR".to_string(),
                value,
            })?,
            Err(_) => defaults.addr,
        };

        let seed_path = env::var("CRUDFLOW_SEED").ok().map(PathBuf::from);

        Ok(Self { database_url, addr, seed_path })
    }
}

fn default_resource(url: &str, fallback_path: &str) -> ResourceConfig {
    ResourceConfig::from_url(url).unwrap_or_else(|| ResourceConfig::new(url, fallback_path))
}

fn resource_from_var<F>(
    lookup: &F,
    key: &str,
    default: ResourceConfig,
) -> Result<ResourceConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => ResourceConfig::from_url(&value).ok_or_else(|| ConfigError::InvalidUrl {
            key: key.to_string(),
            value,
        }),
        None => Ok(default),
    }
}
