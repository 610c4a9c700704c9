//! Versioned rule settings.
//!
//! Thresholds, cutoff dates and code lists used by rules are data, loaded from
//! `rule_settings.toml`, so rule content can change without touching the
//! engine. Keys are namespaced by rule, e.g. `"DateOfBirth_48.min_age"`.
//!
//! ```toml
//! [settings]
//! version = "2018-19.1"
//! academic_year = 2018
//!
//! [thresholds]
//! "DateOfBirth_48.min_age" = 19
//!
//! [dates]
//! "LearnStartDate_14.cutoff" = "2017-05-01"
//!
//! [code_sets]
//! "DateOfBirth_48.exempt_ldm" = ["034"]
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ReferenceError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsHeader {
    pub version: String,
    pub academic_year: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSettings {
    pub settings: SettingsHeader,
    #[serde(default)]
    pub thresholds: BTreeMap<String, i64>,
    #[serde(default)]
    pub dates: BTreeMap<String, NaiveDate>,
    #[serde(default)]
    pub code_sets: BTreeMap<String, BTreeSet<String>>,
}

/// A setting a rule depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SettingKey {
    Threshold(&'static str),
    Date(&'static str),
    CodeSet(&'static str),
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Threshold(key) => write!(f, "thresholds.{key}"),
            Self::Date(key) => write!(f, "dates.{key}"),
            Self::CodeSet(key) => write!(f, "code_sets.{key}"),
        }
    }
}

impl RuleSettings {
    pub fn new(version: impl Into<String>, academic_year: i32) -> Self {
        Self {
            settings: SettingsHeader {
                version: version.into(),
                academic_year,
            },
            thresholds: BTreeMap::new(),
            dates: BTreeMap::new(),
            code_sets: BTreeMap::new(),
        }
    }

    pub fn from_toml_str(contents: &str, path: &Path) -> Result<Self, ReferenceError> {
        let settings: Self = toml::from_str(contents).map_err(|e| ReferenceError::Toml {
            path: path.to_path_buf(),
            source: e,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, ReferenceError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ReferenceError::io(path, e))?;
        Self::from_toml_str(&contents, path)
    }

    fn validate(&self) -> Result<(), ReferenceError> {
        if self.settings.version.trim().is_empty() {
            return Err(ReferenceError::InvalidSettings {
                message: "settings.version must not be blank".to_string(),
            });
        }
        if let Some((key, _)) = self.code_sets.iter().find(|(_, codes)| codes.is_empty()) {
            return Err(ReferenceError::InvalidSettings {
                message: format!("code set {key} is empty"),
            });
        }
        Ok(())
    }

    pub fn version(&self) -> &str {
        &self.settings.version
    }

    pub fn academic_year(&self) -> i32 {
        self.settings.academic_year
    }

    pub fn threshold(&self, key: &str) -> Option<i64> {
        self.thresholds.get(key).copied()
    }

    pub fn date(&self, key: &str) -> Option<NaiveDate> {
        self.dates.get(key).copied()
    }

    pub fn code_set(&self, key: &str) -> Option<&BTreeSet<String>> {
        self.code_sets.get(key)
    }

    pub fn contains(&self, key: SettingKey) -> bool {
        match key {
            SettingKey::Threshold(key) => self.thresholds.contains_key(key),
            SettingKey::Date(key) => self.dates.contains_key(key),
            SettingKey::CodeSet(key) => self.code_sets.contains_key(key),
        }
    }

    #[must_use]
    pub fn with_threshold(mut self, key: impl Into<String>, value: i64) -> Self {
        self.thresholds.insert(key.into(), value);
        self
    }

    #[must_use]
    pub fn with_date(mut self, key: impl Into<String>, value: NaiveDate) -> Self {
        self.dates.insert(key.into(), value);
        self
    }

    #[must_use]
    pub fn with_code_set<I, S>(mut self, key: impl Into<String>, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.code_sets
            .insert(key.into(), codes.into_iter().map(Into::into).collect());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[settings]
version = "2018-19.1"
academic_year = 2018

[thresholds]
"DateOfBirth_48.min_age" = 19

[dates]
"LearnStartDate_14.cutoff" = "2017-05-01"

[code_sets]
"DateOfBirth_48.exempt_ldm" = ["034", "353"]
"#;

    #[test]
    fn parses_sample() {
        let settings = RuleSettings::from_toml_str(SAMPLE, Path::new("rule_settings.toml"))
            .expect("parse settings");
        assert_eq!(settings.version(), "2018-19.1");
        assert_eq!(settings.academic_year(), 2018);
        assert_eq!(settings.threshold("DateOfBirth_48.min_age"), Some(19));
        assert_eq!(
            settings.date("LearnStartDate_14.cutoff"),
            NaiveDate::from_ymd_opt(2017, 5, 1)
        );
        let codes = settings.code_set("DateOfBirth_48.exempt_ldm").unwrap();
        assert!(codes.contains("034"));
        assert!(settings.contains(SettingKey::CodeSet("DateOfBirth_48.exempt_ldm")));
        assert!(!settings.contains(SettingKey::Threshold("missing")));
    }

    #[test]
    fn rejects_empty_code_set() {
        let toml = r#"
[settings]
version = "1"
academic_year = 2018

[code_sets]
"X.codes" = []
"#;
        let err = RuleSettings::from_toml_str(toml, Path::new("s.toml")).unwrap_err();
        assert!(matches!(err, ReferenceError::InvalidSettings { .. }));
    }

    #[test]
    fn setting_key_display() {
        assert_eq!(
            SettingKey::Threshold("DateOfBirth_48.min_age").to_string(),
            "thresholds.DateOfBirth_48.min_age"
        );
    }
}
