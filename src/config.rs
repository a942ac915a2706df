use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::cli::CliArgs;
use crate::scan::ScanConfig;

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Config {
    pub version: u32,
    /// Directories scanned for repositories.
    pub roots: Vec<PathBuf>,
    /// Absolute repository paths excluded from discovery.
    #[serde(default)]
    pub hidden: Vec<PathBuf>,
    /// Optional allow-list of display names for the flat index.
    #[serde(default)]
    pub projects: Option<Vec<String>>,
    /// Branch name used when initializing repositories and as the fallback
    /// for unborn or detached HEADs.
    pub default_branch: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: 1,
            roots: vec![dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))],
            hidden: Vec::new(),
            projects: None,
            default_branch: "main".to_string(),
        }
    }
}

pub fn get_default_config_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("", "", "gitgrove")
        .context("Failed to determine project directories")?;

    let config_dir = proj_dirs.config_dir();
    Ok(config_dir.join("gitgrove.toml"))
}

impl Config {
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let path = match config_path {
            Some(p) => p,
            None => get_default_config_path()?,
        };

        if !path.exists() {
            let default_config = Config::default();
            // Create directory if it doesn't exist
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).context("Failed to create config directory")?;
            }
            default_config.save(&path)?;
            return Ok(default_config);
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(&path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    pub fn from_cli_and_file(cli_args: &CliArgs, config_path: Option<PathBuf>) -> Result<Self> {
        let mut config = Self::load(config_path)?;

        // CLI args override config file
        if !cli_args.roots.is_empty() {
            config.roots = cli_args.roots.clone();
        }

        Ok(config)
    }

    /// The read-only slice of the configuration the scanners consume.
    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            roots: self.roots.clone(),
            hidden: self.hidden.clone(),
            projects: self.projects.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Command;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.version, 1);
        assert_eq!(config.roots.len(), 1);
        assert!(config.hidden.is_empty());
        assert!(config.projects.is_none());
        assert_eq!(config.default_branch, "main");
    }

    #[test]
    fn test_config_serialization_roundtrip() -> Result<()> {
        let mut config = Config::default();
        config.roots = vec![PathBuf::from("/srv/git"), PathBuf::from("/opt/mirrors")];
        config.hidden = vec![PathBuf::from("/srv/git/private")];
        config.projects = Some(vec!["web".to_string(), "team/api".to_string()]);

        let toml_str = toml::to_string(&config)?;
        let parsed_config: Config = toml::from_str(&toml_str)?;

        assert_eq!(config, parsed_config);
        Ok(())
    }

    #[test]
    fn test_absent_projects_stays_none() -> Result<()> {
        let config: Config = toml::from_str(
            r#"
            version = 1
            roots = ["/srv/git"]
            default_branch = "main"
            "#,
        )?;

        assert!(config.projects.is_none());
        assert!(config.hidden.is_empty());
        Ok(())
    }

    #[test]
    fn test_empty_projects_list_is_kept() -> Result<()> {
        let config: Config = toml::from_str(
            r#"
            version = 1
            roots = ["/srv/git"]
            projects = []
            default_branch = "main"
            "#,
        )?;

        // Present-but-empty means "show nothing", distinct from absent
        assert_eq!(config.projects, Some(Vec::new()));
        Ok(())
    }

    #[test]
    fn test_config_load_nonexistent_creates_default() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("nonexistent.toml");

        let config = Config::load(Some(config_path.clone()))?;

        // Should create default config
        assert_eq!(config.version, 1);
        assert_eq!(config.default_branch, "main");

        // Should have created the file
        assert!(config_path.exists());

        Ok(())
    }

    #[test]
    fn test_config_save_and_load() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("test.toml");

        let mut config = Config::default();
        config.roots = vec![PathBuf::from("/custom/path")];
        config.default_branch = "trunk".to_string();

        config.save(&config_path)?;
        let loaded_config = Config::load(Some(config_path))?;

        assert_eq!(config.roots, loaded_config.roots);
        assert_eq!(config.default_branch, loaded_config.default_branch);

        Ok(())
    }

    #[test]
    fn test_cli_override() -> Result<()> {
        let cli_args = CliArgs {
            roots: vec![PathBuf::from("/override/path")],
            config: None,
            command: Command::List,
        };

        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("test.toml");

        // Create a config file with different roots
        let original_config = Config {
            roots: vec![PathBuf::from("/original/path")],
            ..Config::default()
        };
        original_config.save(&config_path)?;

        // CLI should override
        let final_config = Config::from_cli_and_file(&cli_args, Some(config_path))?;
        assert_eq!(final_config.roots, vec![PathBuf::from("/override/path")]);

        Ok(())
    }

    #[test]
    fn test_scan_config_projection() {
        let mut config = Config::default();
        config.roots = vec![PathBuf::from("/srv/git")];
        config.hidden = vec![PathBuf::from("/srv/git/secret")];
        config.projects = Some(vec!["web".to_string()]);

        let scan = config.scan_config();
        assert_eq!(scan.roots, config.roots);
        assert_eq!(scan.hidden, config.hidden);
        assert_eq!(scan.projects, config.projects);
    }

    #[test]
    fn test_get_default_config_path() -> Result<()> {
        let path = get_default_config_path()?;
        assert!(path.ends_with("gitgrove.toml"));
        Ok(())
    }
}
