use std::path::Path;

use chrono::NaiveDate;
use ilr_reference::hash::sha256_hex;
use ilr_reference::{
    AcademicYearDataService, FcsDataService, LarsDataService, OrganisationDataService,
    PostcodesDataService, ReferenceError, ReferenceRegistry,
};

const SETTINGS: &str = r#"[settings]
version = "2018-19.1"
academic_year = 2018

[thresholds]
"DateOfBirth_48.min_age" = 19

[code_sets]
"DateOfBirth_48.exempt_ldm" = ["034"]
"#;

const POSTCODES: &str = "Postcode,EffectiveFrom,EffectiveTo,LocalAuthority\nB1 1AA,2000-01-01,,E08000025\n";
const LARS: &str = "LearnAimRef,NotionalNVQLevel,CategoryRef,EffectiveFrom,EffectiveTo\n60005415,3,,2015-08-01,\nZPROG001,X,,,\n";
const FCS: &str = "ContractAllocationNumber,StartDate,EndDate,MinAge,MaxAge,LocalAuthorityCodes\nESF-2108,2018-08-01,2019-07-31,19,,E08000025;E08000026\n";
const ORGANISATIONS: &str = "UKPRN,LegalOrgType\n10000001,PLTD\n";

fn write(dir: &Path, name: &str, contents: &str) -> String {
    std::fs::write(dir.join(name), contents).expect("write fixture");
    sha256_hex(contents.as_bytes())
}

fn manifest(entries: &[(&str, &str, &str, String)], academic_year: i32) -> String {
    let mut out = format!(
        "[manifest]\nschema = \"ilr-rules.reference-manifest\"\nschema_version = 1\n\n\
         [pins]\nacademic_year = {academic_year}\nsettings_version = \"2018-19.1\"\n"
    );
    for (path, kind, role, sha) in entries {
        out.push_str(&format!(
            "\n[[files]]\npath = \"{path}\"\nsha256 = \"{sha}\"\nkind = \"{kind}\"\nrole = \"{role}\"\n"
        ));
    }
    out
}

fn fixture(dir: &Path, academic_year: i32) {
    let entries = vec![
        (
            "rule_settings.toml",
            "toml",
            "rule_settings",
            write(dir, "rule_settings.toml", SETTINGS),
        ),
        (
            "postcodes.csv",
            "csv",
            "postcodes",
            write(dir, "postcodes.csv", POSTCODES),
        ),
        ("lars.csv", "csv", "lars", write(dir, "lars.csv", LARS)),
        (
            "fcs_contracts.csv",
            "csv",
            "fcs_contracts",
            write(dir, "fcs_contracts.csv", FCS),
        ),
        (
            "organisations.csv",
            "csv",
            "organisations",
            write(dir, "organisations.csv", ORGANISATIONS),
        ),
    ];
    std::fs::write(dir.join("manifest.toml"), manifest(&entries, academic_year))
        .expect("write manifest");
}

#[test]
fn loads_verified_reference_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    fixture(dir.path(), 2018);

    let (data, summary) = ReferenceRegistry::verify_and_load(dir.path()).expect("load");

    assert_eq!(summary.file_count, 5);
    assert_eq!(summary.postcode_count, 1);
    assert_eq!(summary.lars_count, 2);
    assert_eq!(summary.contract_count, 1);
    assert_eq!(summary.organisation_count, 1);

    assert_eq!(data.settings.threshold("DateOfBirth_48.min_age"), Some(19));
    assert_eq!(
        data.calendar.start(),
        NaiveDate::from_ymd_opt(2018, 8, 1).unwrap()
    );
    assert!(data.postcodes.exists("b1 1aa"));
    assert_eq!(
        data.lars
            .learning_delivery("zprog001")
            .and_then(|l| l.notional_nvq_level.as_deref()),
        Some("X")
    );
    let contract = data.fcs.contract_allocation("ESF-2108").expect("contract");
    assert_eq!(contract.min_age, Some(19));
    assert!(contract.local_authority_codes.contains("E08000026"));
    assert_eq!(data.organisations.legal_org_type(10000001), Some("PLTD"));
}

#[test]
fn detects_modified_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    fixture(dir.path(), 2018);
    std::fs::write(dir.path().join("lars.csv"), "LearnAimRef\nTAMPERED\n").expect("tamper");

    let err = ReferenceRegistry::verify_and_load(dir.path()).unwrap_err();
    assert!(matches!(err, ReferenceError::Sha256Mismatch { .. }), "{err}");
}

#[test]
fn rejects_unlisted_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    fixture(dir.path(), 2018);
    std::fs::write(dir.path().join("stray.csv"), "x\n").expect("stray");

    let err = ReferenceRegistry::verify_and_load(dir.path()).unwrap_err();
    assert!(matches!(err, ReferenceError::UnexpectedFile { .. }), "{err}");
}

#[test]
fn rejects_missing_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    fixture(dir.path(), 2018);
    std::fs::remove_file(dir.path().join("organisations.csv")).expect("remove");

    let err = ReferenceRegistry::verify_and_load(dir.path()).unwrap_err();
    assert!(matches!(err, ReferenceError::MissingFile { .. }), "{err}");
}

#[test]
fn rejects_academic_year_pin_mismatch() {
    let dir = tempfile::tempdir().expect("tempdir");
    fixture(dir.path(), 2019);

    let err = ReferenceRegistry::verify_and_load(dir.path()).unwrap_err();
    assert!(matches!(err, ReferenceError::InvalidManifest { .. }), "{err}");
}

#[test]
fn rejects_manifest_without_required_role() {
    let dir = tempfile::tempdir().expect("tempdir");
    let sha = write(dir.path(), "rule_settings.toml", SETTINGS);
    let entries = vec![("rule_settings.toml", "toml", "rule_settings", sha)];
    std::fs::write(dir.path().join("manifest.toml"), manifest(&entries, 2018))
        .expect("write manifest");

    let err = ReferenceRegistry::verify_and_load(dir.path()).unwrap_err();
    assert!(
        matches!(&err, ReferenceError::MissingRole { role } if role == "postcodes"),
        "{err}"
    );
}

#[test]
fn rejects_unlisted_file_in_subdirectory() {
    let dir = tempfile::tempdir().expect("tempdir");
    fixture(dir.path(), 2018);
    std::fs::create_dir(dir.path().join("old")).expect("mkdir");
    std::fs::write(dir.path().join("old/lars.csv"), LARS).expect("stray");

    let err = ReferenceRegistry::verify_and_load(dir.path()).unwrap_err();
    assert!(
        matches!(&err, ReferenceError::UnexpectedFile { path } if path.ends_with("old/lars.csv")),
        "{err}"
    );
}
