//! Tunable engine settings, read from a YAML file
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fs;
use std::path::Path;
use log::debug;
use serde::{Deserialize, Serialize};

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Engine settings. Fields missing from a configuration file keep their default values.
///
/// ```
/// use kestrel::engine::config::Config;
/// let config = Config::from_yaml_str("king_safety:\n  shield_missing: 40\n").unwrap();
/// assert_eq!(config.king_safety.shield_missing, 40);
/// assert_eq!(config.king_safety.shield_distance, 10);
/// assert!(!config.ordering.score_captures);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// King-safety evaluation weights
    pub king_safety: KingSafety,
    /// Move ordering options
    pub ordering: Ordering,
}

/// King-safety evaluation weights, in centipawns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KingSafety {
    /// Penalty for each file next to the king with no pawn of the king's color
    pub shield_missing: i32,
    /// Penalty per rank between the king and a shield pawn more than one rank away
    pub shield_distance: i32,
}

impl Default for KingSafety {
    fn default() -> Self {
        KingSafety {
            shield_missing: 50,
            shield_distance: 10,
        }
    }
}

/// Move ordering options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ordering {
    /// Sort captures by most valuable victim, then least valuable attacker
    pub score_captures: bool,
}

impl Config {
    /// Reads the configuration from a YAML file
    pub fn load(path: &Path) -> Result<Config, Error> {
        let s = fs::read_to_string(path)
            .map_err(|err| Error(format!("{}: {}", path.display(), err)))?;
        let config = Config::from_yaml_str(&s)
            .map_err(|err| Error(format!("{}: {}", path.display(), err)))?;

        debug!("configuration loaded from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Parses the configuration from a YAML string
    pub fn from_yaml_str(s: &str) -> Result<Config, Error> {
        if s.trim().is_empty() {
            return Ok(Config::default());
        }

        Ok(serde_yaml::from_str(s)?)
    }

    /// Writes the configuration out as YAML
    pub fn to_yaml_string(&self) -> Result<String, Error> {
        Ok(serde_yaml::to_string(self)?)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Error reading or writing a configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error(String);

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        self.0.fmt(f)
    }
}

impl std::error::Error for Error { }

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use super::*;

    #[test]
    fn empty_document_is_the_default() {
        assert_eq!(Config::from_yaml_str("").unwrap(), Config::default());
        assert_eq!(Config::from_yaml_str("---\n{}\n").unwrap(), Config::default());
    }

    #[test]
    fn all_fields_are_read() {
        let config = Config::from_yaml_str(
            "king_safety:\n  shield_missing: 30\n  shield_distance: 5\nordering:\n  score_captures: true\n"
        ).unwrap();
        assert_eq!(config.king_safety, KingSafety { shield_missing: 30, shield_distance: 5 });
        assert!(config.ordering.score_captures);
    }

    #[test]
    fn bad_values_are_errors() {
        assert!(Config::from_yaml_str("king_safety:\n  shield_missing: lots\n").is_err());
    }

    #[test]
    fn yaml_round_trip_keeps_values() {
        let mut config = Config::default();
        config.ordering.score_captures = true;
        let s = config.to_yaml_string().unwrap();
        assert_eq!(Config::from_yaml_str(&s).unwrap(), config);
    }

    #[test]
    fn load_reads_a_file() {
        let path = std::env::temp_dir().join(format!("kestrel-config-{}.yaml", std::process::id()));
        {
            let mut file = fs::File::create(&path).unwrap();
            writeln!(file, "king_safety:\n  shield_distance: 12").unwrap();
        }
        let config = Config::load(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(config.king_safety.shield_distance, 12);
        assert_eq!(config.king_safety.shield_missing, 50);
    }

    #[test]
    fn load_reports_the_missing_path() {
        let err = Config::load(Path::new("/nonexistent/kestrel.yaml")).unwrap_err();
        assert!(err.to_string().starts_with("/nonexistent/kestrel.yaml"));
    }
}
