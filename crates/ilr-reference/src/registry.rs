#![deny(unsafe_code)]

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::calendar::AcademicCalendar;
use crate::csv::fcs::parse_fcs_csv;
use crate::csv::lars::parse_lars_csv;
use crate::csv::organisations::parse_organisations_csv;
use crate::csv::postcodes::parse_postcodes_csv;
use crate::error::ReferenceError;
use crate::fcs::InMemoryFcs;
use crate::hash::sha256_hex;
use crate::lars::InMemoryLars;
use crate::manifest::{Manifest, ManifestFile, Pins, Role, RoleFiles};
use crate::organisations::InMemoryOrganisations;
use crate::postcodes::InMemoryPostcodes;
use crate::settings::RuleSettings;

pub const MANIFEST_FILE: &str = "manifest.toml";

#[derive(Debug, Clone, serde::Serialize)]
pub struct VerifySummary {
    pub reference_dir: PathBuf,
    pub manifest_pins: Pins,
    pub file_count: usize,
    pub postcode_count: usize,
    pub lars_count: usize,
    pub contract_count: usize,
    pub organisation_count: usize,
    pub threshold_count: usize,
    pub date_count: usize,
    pub code_set_count: usize,
}

/// Fully loaded, read-only reference data for one validation run.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub settings: Arc<RuleSettings>,
    pub calendar: Arc<AcademicCalendar>,
    pub postcodes: Arc<InMemoryPostcodes>,
    pub lars: Arc<InMemoryLars>,
    pub fcs: Arc<InMemoryFcs>,
    pub organisations: Arc<InMemoryOrganisations>,
}

impl ReferenceData {
    /// Reference data with empty lookup tables, for callers that build their own.
    pub fn from_settings(settings: RuleSettings) -> Result<Self, ReferenceError> {
        let calendar = calendar_for(&settings)?;
        Ok(Self {
            settings: Arc::new(settings),
            calendar: Arc::new(calendar),
            postcodes: Arc::new(InMemoryPostcodes::default()),
            lars: Arc::new(InMemoryLars::default()),
            fcs: Arc::new(InMemoryFcs::default()),
            organisations: Arc::new(InMemoryOrganisations::default()),
        })
    }

    #[must_use]
    pub fn with_postcodes(mut self, postcodes: InMemoryPostcodes) -> Self {
        self.postcodes = Arc::new(postcodes);
        self
    }

    #[must_use]
    pub fn with_lars(mut self, lars: InMemoryLars) -> Self {
        self.lars = Arc::new(lars);
        self
    }

    #[must_use]
    pub fn with_fcs(mut self, fcs: InMemoryFcs) -> Self {
        self.fcs = Arc::new(fcs);
        self
    }

    #[must_use]
    pub fn with_organisations(mut self, organisations: InMemoryOrganisations) -> Self {
        self.organisations = Arc::new(organisations);
        self
    }
}

pub struct ReferenceRegistry;

impl ReferenceRegistry {
    /// Verify every file listed in `manifest.toml` and load the reference tables.
    pub fn verify_and_load(
        reference_dir: &Path,
    ) -> Result<(ReferenceData, VerifySummary), ReferenceError> {
        let manifest = Manifest::load(&reference_dir.join(MANIFEST_FILE))?;
        let by_role = manifest.entries_by_role()?;
        reject_unlisted_files(reference_dir, &by_role)?;

        for (role, file) in &by_role {
            verify_sha256(reference_dir, file)?;
            debug!(path = %file.path, role = %role, "verified reference file");
        }

        let path = |role: Role| {
            by_role
                .get(&role)
                .map(|file| reference_dir.join(&file.path))
                .ok_or_else(|| ReferenceError::MissingRole {
                    role: role.to_string(),
                })
        };
        let settings = RuleSettings::load(&path(Role::RuleSettings)?)?;
        manifest.pins.check(&settings)?;

        let postcodes =
            InMemoryPostcodes::from_records(parse_postcodes_csv(&path(Role::Postcodes)?)?);
        let lars = InMemoryLars::from_records(parse_lars_csv(&path(Role::Lars)?)?);
        let fcs = InMemoryFcs::from_records(parse_fcs_csv(&path(Role::FcsContracts)?)?);
        let organisations = InMemoryOrganisations::from_records(parse_organisations_csv(
            &path(Role::Organisations)?,
        )?);

        let summary = VerifySummary {
            reference_dir: reference_dir.to_path_buf(),
            manifest_pins: manifest.pins.clone(),
            file_count: by_role.len(),
            postcode_count: postcodes.len(),
            lars_count: lars.len(),
            contract_count: fcs.len(),
            organisation_count: organisations.len(),
            threshold_count: settings.thresholds.len(),
            date_count: settings.dates.len(),
            code_set_count: settings.code_sets.len(),
        };

        info!(
            reference_dir = %reference_dir.display(),
            academic_year = manifest.pins.academic_year,
            settings_version = %manifest.pins.settings_version,
            postcodes = summary.postcode_count,
            lars = summary.lars_count,
            contracts = summary.contract_count,
            organisations = summary.organisation_count,
            "reference data loaded"
        );

        let data = ReferenceData::from_settings(settings)?
            .with_postcodes(postcodes)
            .with_lars(lars)
            .with_fcs(fcs)
            .with_organisations(organisations);
        Ok((data, summary))
    }
}

fn calendar_for(settings: &RuleSettings) -> Result<AcademicCalendar, ReferenceError> {
    AcademicCalendar::for_start_year(settings.academic_year()).ok_or_else(|| {
        ReferenceError::InvalidSettings {
            message: format!("unsupported academic_year {}", settings.academic_year()),
        }
    })
}

fn verify_sha256(reference_dir: &Path, file: &ManifestFile) -> Result<(), ReferenceError> {
    let full_path = reference_dir.join(&file.path);
    let bytes = std::fs::read(&full_path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ReferenceError::MissingFile {
            path: full_path.clone(),
        },
        _ => ReferenceError::io(&full_path, e),
    })?;

    let actual = sha256_hex(&bytes);
    let expected = file.sha256.to_ascii_lowercase();
    if actual != expected {
        return Err(ReferenceError::Sha256Mismatch {
            path: full_path,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Only the manifest and the files it lists may live in the reference directory.
fn reject_unlisted_files(
    reference_dir: &Path,
    by_role: &RoleFiles<'_>,
) -> Result<(), ReferenceError> {
    let mut listed = BTreeSet::from([PathBuf::from(MANIFEST_FILE)]);
    for file in by_role.values() {
        listed.insert(file.relative_path()?);
    }
    let mut present = Vec::new();
    collect_files(reference_dir, reference_dir, &mut present)?;
    match present.into_iter().find(|path| !listed.contains(path)) {
        Some(path) => Err(ReferenceError::UnexpectedFile {
            path: reference_dir.join(path),
        }),
        None => Ok(()),
    }
}

fn collect_files(root: &Path, dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), ReferenceError> {
    for entry in std::fs::read_dir(dir).map_err(|e| ReferenceError::io(dir, e))? {
        let path = entry.map_err(|e| ReferenceError::io(dir, e))?.path();
        if path.is_dir() {
            collect_files(root, &path, out)?;
        } else if let Ok(relative) = path.strip_prefix(root) {
            out.push(relative.to_path_buf());
        }
    }
    Ok(())
}
