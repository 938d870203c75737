use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use shifting_maze_core::{GridSize, DEFAULT_GRID_SIZE};

/// Configuration file consulted when `--config` is not provided.
pub(crate) const DEFAULT_CONFIG_PATH: &str = "shifting-maze.toml";

/// Host settings read from the optional TOML configuration file.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    /// Folder holding one sub-folder per stage.
    pub(crate) worlds_dir: PathBuf,
    /// JSON file recording unlock progress.
    pub(crate) save_file: PathBuf,
    /// Dimensions every world is padded to.
    pub(crate) grid: GridConfig,
}

/// Grid dimensions section of the configuration file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GridConfig {
    columns: u32,
    rows: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            worlds_dir: PathBuf::from("Worlds"),
            save_file: PathBuf::from("save.json"),
            grid: GridConfig::default(),
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_GRID_SIZE.columns(),
            rows: DEFAULT_GRID_SIZE.rows(),
        }
    }
}

impl Config {
    /// Loads the configuration, tolerating a missing default file.
    ///
    /// An explicitly requested file must exist.
    pub(crate) fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_PATH);
                if path.exists() {
                    Self::from_file(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Grid dimensions requested by the configuration.
    #[must_use]
    pub(crate) fn grid_size(&self) -> GridSize {
        GridSize::new(self.grid.columns, self.grid.rows)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration at {}", path.display()))?;
        parse_config(&contents)
            .with_context(|| format!("invalid configuration in {}", path.display()))
    }
}

fn parse_config(contents: &str) -> Result<Config> {
    let config: Config =
        toml::from_str(contents).context("failed to parse configuration toml contents")?;
    if config.grid.columns == 0 || config.grid.rows == 0 {
        bail!(
            "grid dimensions must be positive, found {}x{}",
            config.grid.columns,
            config.grid.rows
        );
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = parse_config("").expect("empty config should parse");
        assert_eq!(config, Config::default());
        assert_eq!(config.grid_size(), DEFAULT_GRID_SIZE);
    }

    #[test]
    fn keys_override_defaults() {
        let config = parse_config(
            r#"
            worlds_dir = "levels"
            save_file = "progress/save.json"

            [grid]
            columns = 12
            "#,
        )
        .expect("config should parse");

        assert_eq!(config.worlds_dir, PathBuf::from("levels"));
        assert_eq!(config.save_file, PathBuf::from("progress/save.json"));
        assert_eq!(config.grid_size(), GridSize::new(12, 10));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = parse_config("world_dir = \"typo\"");
        assert!(result.is_err(), "misspelled keys must not be ignored");

        let result = parse_config("[grid]\nheight = 4");
        assert!(result.is_err(), "unknown grid keys must not be ignored");
    }

    #[test]
    fn zero_sized_grid_is_rejected() {
        let result = parse_config("[grid]\nrows = 0");
        assert!(result.is_err(), "a grid without rows cannot hold a maze");
    }
}
