//! The optional `wlzig.toml` manifest.
//!
//! ```toml
//! protocols = ["protocols/wayland.xml", "protocols/xdg-shell.xml"]
//! output-dir = "src/protocols"
//! runtime-dir = ".."
//! format = true
//! formatter = ["zig", "fmt"]
//! ```

#[cfg(test)]
mod tests;

use {
    serde::Deserialize,
    std::{
        io,
        path::{Path, PathBuf},
    },
    thiserror::Error,
};

pub const DEFAULT_CONFIG: &str = "wlzig.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read {}", .0.display())]
    Read(PathBuf, #[source] io::Error),
    #[error("Could not parse {}", .0.display())]
    Parse(PathBuf, #[source] toml::de::Error),
    #[error("Formatting is enabled but the formatter command is empty")]
    EmptyFormatter,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// The protocol documents in the order in which they are registered.
    #[serde(default)]
    pub protocols: Vec<PathBuf>,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// The directory containing the runtime support files, relative to the output
    /// directory.
    #[serde(default = "default_runtime_dir")]
    pub runtime_dir: String,
    #[serde(default = "default_format")]
    pub format: bool,
    /// The formatter command. The path of each generated file is appended.
    #[serde(default = "default_formatter")]
    pub formatter: Vec<String>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("generated")
}

fn default_runtime_dir() -> String {
    "..".to_owned()
}

fn default_format() -> bool {
    true
}

fn default_formatter() -> Vec<String> {
    vec!["zig".to_owned(), "fmt".to_owned()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            protocols: vec![],
            output_dir: default_output_dir(),
            runtime_dir: default_runtime_dir(),
            format: default_format(),
            formatter: default_formatter(),
        }
    }
}

impl Config {
    pub fn parse(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Loads the manifest at `path`. Relative paths in it are interpreted relative to
    /// the directory containing the manifest.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_owned(), e))?;
        let mut config =
            Self::parse(&content).map_err(|e| ConfigError::Parse(path.to_owned(), e))?;
        if let Some(dir) = path.parent() {
            config.resolve_paths(dir);
        }
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Loads `explicit` if given, otherwise `wlzig.toml` in the working directory if
    /// it exists, otherwise the defaults.
    pub fn locate(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let path = Path::new(DEFAULT_CONFIG);
        match path.exists() {
            true => Self::load(path),
            false => Ok(Self::default()),
        }
    }

    pub fn resolve_paths(&mut self, base: &Path) {
        for protocol in &mut self.protocols {
            if protocol.is_relative() {
                *protocol = base.join(&*protocol);
            }
        }
        if self.output_dir.is_relative() {
            self.output_dir = base.join(&self.output_dir);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.format && self.formatter.is_empty() {
            return Err(ConfigError::EmptyFormatter);
        }
        Ok(())
    }
}
