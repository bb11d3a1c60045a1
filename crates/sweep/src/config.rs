//! Sweep configuration.
//!
//! Loaded from TOML; every field has a default so an empty document is a
//! valid configuration.
//!
//! ```toml
//! initial_capacity = 128
//! verify_invariants = true
//! max_ranges_per_pass = 100000
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading a [`SweepConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// Error parsing TOML syntax or shape.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),
}

/// Tuning knobs for a [`DecorState`](crate::DecorState).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
	/// Slots reserved up front in the arena and the range index.
	pub initial_capacity: usize,
	/// Check the partition and arena invariants after every sweep step.
	pub verify_invariants: bool,
	/// Ranges one render pass may admit; 0 means unbounded.
	pub max_ranges_per_pass: usize,
}

impl Default for SweepConfig {
	fn default() -> Self {
		Self {
			initial_capacity: 64,
			verify_invariants: cfg!(debug_assertions),
			max_ranges_per_pass: 0,
		}
	}
}

impl SweepConfig {
	pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(s)?)
	}

	/// Reads and parses a configuration file.
	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let text = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml_str(&text)
	}

	/// Limit on admitted ranges, if any.
	pub fn range_limit(&self) -> Option<usize> {
		(self.max_ranges_per_pass > 0).then_some(self.max_ranges_per_pass)
	}
}

#[cfg(test)]
mod tests {
	use std::io::Write;

	use super::*;

	#[test]
	fn test_empty_document_is_default() {
		assert_eq!(SweepConfig::from_toml_str("").unwrap(), SweepConfig::default());
	}

	#[test]
	fn test_partial_override() {
		let config = SweepConfig::from_toml_str("max_ranges_per_pass = 12\nverify_invariants = false").unwrap();
		assert_eq!(config.max_ranges_per_pass, 12);
		assert!(!config.verify_invariants);
		assert_eq!(config.initial_capacity, 64);
		assert_eq!(config.range_limit(), Some(12));
		assert_eq!(SweepConfig::default().range_limit(), None);
	}

	#[test]
	fn test_unknown_field_rejected() {
		let err = SweepConfig::from_toml_str("max_ranges = 3").unwrap_err();
		assert!(matches!(err, ConfigError::Toml(_)));
	}

	#[test]
	fn test_load_from_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "initial_capacity = 8").unwrap();
		let config = SweepConfig::load(file.path()).unwrap();
		assert_eq!(config.initial_capacity, 8);
	}

	#[test]
	fn test_load_missing_file_reports_path() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("absent.toml");
		let err = SweepConfig::load(&path).unwrap_err();
		assert!(err.to_string().contains("absent.toml"));
	}
}
