//! Configuration system
//!
//! The node capacity is construction-time configuration: an `OctreeConfig`
//! is stored on the `Octree` and handed down the recursion by reference.

pub use serde::{Serialize, Deserialize};

/// Configuration trait
///
/// `OctreeConfig` implements this so a tree's capacity can be kept next to
/// the rest of a game's settings. The file extension picks the format:
/// `.toml` goes through `toml`, `.ron` through `ron`. Call
/// [`OctreeConfig::validate`] (or build with `Octree::with_config`) after
/// loading, since deserialization accepts any capacity.
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Value outside its allowed range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Default number of objects a leaf holds before it splits
pub const DEFAULT_CAPACITY: usize = 5;

/// Configuration for octree behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OctreeConfig {
    /// Objects a leaf holds before subdividing on the next insert
    pub capacity: usize,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl OctreeConfig {
    /// Configuration with the given node capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Reject values the tree cannot operate with
    ///
    /// A zero capacity would make every insert split forever.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::Invalid("capacity must be at least 1".to_string()));
        }
        Ok(())
    }
}

impl Config for OctreeConfig {}
