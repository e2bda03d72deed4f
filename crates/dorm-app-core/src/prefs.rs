// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Saved preferences shared by dormitory tools (export + roster display).

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Config key under which [`DormPrefs`] are stored.
pub const PREFS_KEY: &str = "dorm_prefs";

/// How exported delimited text treats fields containing separators or quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportQuoting {
    /// Plain join; fields are written verbatim.
    #[default]
    None,
    /// RFC 4180 quoting for fields that need it.
    Standard,
}

impl FromStr for ExportQuoting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" | "rfc4180" => Ok(Self::Standard),
            other => Err(format!("unknown quoting `{other}` (expected none|standard)")),
        }
    }
}

/// Saved preferences for the dormitory tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DormPrefs {
    /// Title shown above the resident list.
    pub dormitory_name: String,
    /// Directory exports are written to; current directory when unset.
    pub export_dir: Option<PathBuf>,
    /// Quoting rule applied by the export formatter.
    pub export_quoting: ExportQuoting,
    /// Residents per roster page.
    pub page_size: usize,
    /// Seconds a session notice stays visible.
    pub notice_ttl_secs: u64,
}

impl Default for DormPrefs {
    fn default() -> Self {
        Self {
            dormitory_name: "Гуртожиток №8".to_owned(),
            export_dir: None,
            export_quoting: ExportQuoting::None,
            page_size: 10,
            notice_ttl_secs: 4,
        }
    }
}

impl DormPrefs {
    /// Apply a single `key = value` edit as typed on the command line.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::Invalid {
            key: key.to_owned(),
            reason,
        };
        match key {
            "dormitory_name" => self.dormitory_name = value.to_owned(),
            "export_dir" => {
                self.export_dir = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            "export_quoting" => self.export_quoting = value.parse().map_err(invalid)?,
            "page_size" => {
                let n: usize = value.parse().map_err(|e| invalid(format!("{e}")))?;
                if n == 0 {
                    return Err(invalid("must be at least 1".into()));
                }
                self.page_size = n;
            }
            "notice_ttl_secs" => {
                self.notice_ttl_secs = value.parse().map_err(|e| invalid(format!("{e}")))?;
            }
            _ => return Err(invalid("no such setting".into())),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let prefs: DormPrefs = serde_json::from_str(r#"{"page_size": 25}"#).unwrap();
        assert_eq!(prefs.page_size, 25);
        assert_eq!(prefs.export_quoting, ExportQuoting::None);
        assert_eq!(prefs.dormitory_name, "Гуртожиток №8");
    }

    #[test]
    fn set_parses_known_keys() {
        let mut prefs = DormPrefs::default();
        prefs.set("export_quoting", "standard").unwrap();
        prefs.set("export_dir", "/tmp/out").unwrap();
        prefs.set("page_size", "5").unwrap();
        assert_eq!(prefs.export_quoting, ExportQuoting::Standard);
        assert_eq!(prefs.export_dir, Some(PathBuf::from("/tmp/out")));
        assert_eq!(prefs.page_size, 5);

        prefs.set("export_dir", "").unwrap();
        assert_eq!(prefs.export_dir, None);
    }

    #[test]
    fn set_rejects_bad_values() {
        let mut prefs = DormPrefs::default();
        assert!(matches!(
            prefs.set("page_size", "0"),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(prefs.set("export_quoting", "fancy").is_err());
        assert!(prefs.set("colour", "blue").is_err());
        assert_eq!(prefs, DormPrefs::default());
    }
}
