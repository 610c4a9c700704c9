#![deny(unsafe_code)]

//! `manifest.toml`: the pinned academic year and settings version, plus one
//! sha256-pinned entry per reference table.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ReferenceError;
use crate::settings::RuleSettings;

pub const MANIFEST_SCHEMA: &str = "ilr-rules.reference-manifest";
pub const MANIFEST_SCHEMA_VERSION: u32 = 1;

/// The table a manifest entry provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    RuleSettings,
    Postcodes,
    Lars,
    FcsContracts,
    Organisations,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::RuleSettings,
        Role::Postcodes,
        Role::Lars,
        Role::FcsContracts,
        Role::Organisations,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::RuleSettings => "rule_settings",
            Self::Postcodes => "postcodes",
            Self::Lars => "lars",
            Self::FcsContracts => "fcs_contracts",
            Self::Organisations => "organisations",
        }
    }

    /// Format the entry for this role must declare.
    pub fn kind(self) -> FileKind {
        match self {
            Self::RuleSettings => FileKind::Toml,
            _ => FileKind::Csv,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Csv,
    Toml,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub manifest: ManifestHeader,
    pub pins: Pins,
    pub files: Vec<ManifestFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestHeader {
    pub schema: String,
    pub schema_version: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pins {
    /// Calendar year in which the academic year starts (2018 for 2018/19).
    pub academic_year: i32,
    pub settings_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestFile {
    pub path: String,
    pub sha256: String,
    pub kind: FileKind,
    pub role: Role,
}

/// Manifest entries keyed by role, after every entry has been checked.
pub type RoleFiles<'a> = BTreeMap<Role, &'a ManifestFile>;

impl Manifest {
    pub fn load(path: &Path) -> Result<Self, ReferenceError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ReferenceError::io(path, e))?;
        toml::from_str(&contents).map_err(|e| ReferenceError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Check the header and every entry, and index the entries by role.
    ///
    /// Each role appears exactly once, with the kind it requires, a
    /// well-formed sha256 and a relative path inside the reference directory.
    pub fn entries_by_role(&self) -> Result<RoleFiles<'_>, ReferenceError> {
        if self.manifest.schema != MANIFEST_SCHEMA
            || self.manifest.schema_version != MANIFEST_SCHEMA_VERSION
        {
            return Err(ReferenceError::InvalidManifest {
                message: format!(
                    "expected schema {MANIFEST_SCHEMA} v{MANIFEST_SCHEMA_VERSION}, found {} v{}",
                    self.manifest.schema, self.manifest.schema_version
                ),
            });
        }

        let mut by_role = RoleFiles::new();
        for file in &self.files {
            if by_role.insert(file.role, file).is_some() {
                return Err(ReferenceError::DuplicateRole {
                    role: file.role.to_string(),
                });
            }
            if file.kind != file.role.kind() {
                return Err(ReferenceError::InvalidManifest {
                    message: format!(
                        "{} must be a {:?} file, {} is declared {:?}",
                        file.role,
                        file.role.kind(),
                        file.path,
                        file.kind
                    ),
                });
            }
            file.check_sha256()?;
            file.relative_path()?;
        }

        if let Some(role) = Role::ALL.into_iter().find(|r| !by_role.contains_key(r)) {
            return Err(ReferenceError::MissingRole {
                role: role.to_string(),
            });
        }
        Ok(by_role)
    }
}

impl Pins {
    /// The rule settings must be the ones the manifest was pinned against.
    pub fn check(&self, settings: &RuleSettings) -> Result<(), ReferenceError> {
        if settings.academic_year() != self.academic_year {
            return Err(ReferenceError::InvalidManifest {
                message: format!(
                    "pinned academic_year {} does not match rule settings academic_year {}",
                    self.academic_year,
                    settings.academic_year()
                ),
            });
        }
        if settings.version() != self.settings_version {
            return Err(ReferenceError::InvalidManifest {
                message: format!(
                    "pinned settings_version {} does not match rule settings version {}",
                    self.settings_version,
                    settings.version()
                ),
            });
        }
        Ok(())
    }
}

impl ManifestFile {
    fn check_sha256(&self) -> Result<(), ReferenceError> {
        if self.sha256.len() == 64 && self.sha256.chars().all(|c| c.is_ascii_hexdigit()) {
            return Ok(());
        }
        Err(ReferenceError::InvalidSha256 {
            path: PathBuf::from(&self.path),
            message: "sha256 must be 64 hex characters".to_string(),
        })
    }

    /// The entry's path relative to the reference directory, without `.`
    /// components. Absolute, `\`-separated and `..` paths are rejected.
    pub fn relative_path(&self) -> Result<PathBuf, ReferenceError> {
        let invalid = |message: &str| ReferenceError::InvalidPath {
            path: PathBuf::from(&self.path),
            message: message.to_string(),
        };
        if self.path.contains('\\') {
            return Err(invalid("manifest path must use '/' separators"));
        }
        let mut relative = PathBuf::new();
        for component in Path::new(&self.path).components() {
            match component {
                Component::Normal(part) => relative.push(part),
                Component::CurDir => {}
                Component::ParentDir => {
                    return Err(invalid("manifest path must not leave the reference directory"));
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(invalid("manifest path must be relative"));
                }
            }
        }
        if relative.as_os_str().is_empty() {
            return Err(invalid("manifest path is empty"));
        }
        Ok(relative)
    }
}
