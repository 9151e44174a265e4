use config::{Config, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod validator;
pub mod watcher;

use crate::cli::Cli;
use crate::domain::{CategoryDefinition, CategoryRegistry};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub categories: CategorySettings,
    /// Directory relative paths in the file are resolved against
    #[serde(skip)]
    pub root: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CategorySettings {
    /// Directory holding one JSON or YAML file per category
    #[serde(default = "default_categories_dir")]
    pub dir: PathBuf,
    /// Tenant served when a request carries no tenant header
    #[serde(default)]
    pub default_tenant: Option<String>,
    /// Reload definitions when files in `dir` change
    #[serde(default = "default_watch")]
    pub watch: bool,
}

impl Default for CategorySettings {
    fn default() -> Self {
        Self {
            dir: default_categories_dir(),
            default_tenant: None,
            watch: default_watch(),
        }
    }
}

fn default_categories_dir() -> PathBuf {
    PathBuf::from("config/categories")
}

fn default_watch() -> bool {
    true
}

impl Settings {
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        let mut settings = Self::from_file(&cli.config)?;

        // CLI > env vars > config file
        settings.apply_cli_overrides(cli);

        Ok(settings)
    }

    /// Load `retailcloud.toml` from `root`, for tests and tooling
    pub fn from_root(root: &Path) -> Result<Self, anyhow::Error> {
        Self::from_file(&root.join("retailcloud.toml"))
    }

    fn from_file(config_path: &Path) -> Result<Self, anyhow::Error> {
        let root = config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let s = Config::builder()
            .add_source(File::from(config_path.to_path_buf()).required(false))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .build()?;

        let mut settings: Settings = s.try_deserialize()?;
        settings.root = root;
        Ok(settings)
    }

    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(host) = &cli.host {
            self.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        if let Some(dir) = &cli.categories_dir {
            self.categories.dir = dir.clone();
        }
        if let Some(tenant) = &cli.default_tenant {
            self.categories.default_tenant = Some(tenant.clone());
        }
        if cli.no_watch {
            self.categories.watch = false;
        }
    }

    pub fn categories_dir(&self) -> PathBuf {
        if self.categories.dir.is_absolute() {
            self.categories.dir.clone()
        } else {
            self.root.join(&self.categories.dir)
        }
    }

    /// Read every category definition file, sorted by path so that load
    /// order does not depend on the filesystem
    pub fn load_category_definitions(&self) -> Result<Vec<CategoryDefinition>, anyhow::Error> {
        let dir = self.categories_dir();
        if !dir.is_dir() {
            tracing::warn!("Category directory does not exist: {}", dir.display());
            return Ok(Vec::new());
        }

        let pattern = format!("{}/*", dir.display());
        let mut paths = Vec::new();
        for entry in glob::glob(&pattern)? {
            match entry {
                Ok(path) => paths.push(path),
                Err(e) => tracing::warn!("Failed to read glob entry: {}", e),
            }
        }
        paths.sort();

        let mut definitions = Vec::new();
        for path in paths {
            let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
                continue;
            };
            if !matches!(ext, "json" | "yaml" | "yml") {
                continue;
            }
            let content = std::fs::read_to_string(&path)?;
            let definition: CategoryDefinition = if ext == "json" {
                serde_json::from_str(&content)
                    .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?
            } else {
                serde_yaml::from_str(&content)
                    .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?
            };
            tracing::debug!(
                "Loaded category '{}' with {} fields from {}",
                definition.category,
                definition.fields.len(),
                path.display()
            );
            definitions.push(definition);
        }

        Ok(definitions)
    }

    /// Load, validate and index the category definitions
    pub fn load_registry(&self) -> Result<CategoryRegistry, anyhow::Error> {
        let definitions = self.load_category_definitions()?;

        validator::CategoryValidator::validate(&definitions).map_err(|errors| {
            let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!(
                "Configuration validation failed:\n{}",
                error_messages.join("\n")
            )
        })?;

        Ok(CategoryRegistry::build(
            &definitions,
            self.categories.default_tenant.clone(),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_overrides_file_values() {
        let cli = Cli::parse_from([
            "retailcloud",
            "--config",
            "/nonexistent/retailcloud.toml",
            "--port",
            "8080",
            "--default-tenant",
            "acme",
            "--no-watch",
        ]);
        let settings = Settings::new_with_cli(&cli).unwrap();

        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.categories.default_tenant.as_deref(), Some("acme"));
        assert!(!settings.categories.watch);
        assert_eq!(
            settings.categories_dir(),
            PathBuf::from("/nonexistent/config/categories")
        );
    }

    #[test]
    fn test_missing_category_dir_loads_nothing() {
        let cli = Cli::parse_from(["retailcloud", "--config", "/nonexistent/retailcloud.toml"]);
        let settings = Settings::new_with_cli(&cli).unwrap();
        let registry = settings.load_registry().unwrap();
        assert!(registry.is_empty());
    }
}
