//! The immutable bundle of collaborators bound to rules at composition.

use std::sync::Arc;

use ilr_reference::{
    AcademicYearDataService, FcsDataService, LarsDataService, OrganisationDataService,
    PostcodesDataService, ReferenceData, RuleSettings,
};

use crate::rule::Requirement;

/// Reference-data services, rule settings and the academic calendar shared by
/// every rule of a rule set.
///
/// Lookup services are optional; a rule declaring a [`Requirement`] the
/// toolbox cannot satisfy is rejected when the rule set is composed.
#[derive(Clone)]
pub struct Toolbox {
    settings: Arc<RuleSettings>,
    calendar: Arc<dyn AcademicYearDataService>,
    postcodes: Option<Arc<dyn PostcodesDataService>>,
    lars: Option<Arc<dyn LarsDataService>>,
    fcs: Option<Arc<dyn FcsDataService>>,
    organisations: Option<Arc<dyn OrganisationDataService>>,
    ukprn: Option<i64>,
}

impl Toolbox {
    pub fn new(settings: Arc<RuleSettings>, calendar: Arc<dyn AcademicYearDataService>) -> Self {
        Self {
            settings,
            calendar,
            postcodes: None,
            lars: None,
            fcs: None,
            organisations: None,
            ukprn: None,
        }
    }

    /// Toolbox wired to every loaded reference table.
    pub fn from_reference(data: &ReferenceData) -> Self {
        Self::new(Arc::clone(&data.settings), data.calendar.clone())
            .with_postcodes(data.postcodes.clone())
            .with_lars(data.lars.clone())
            .with_fcs(data.fcs.clone())
            .with_organisations(data.organisations.clone())
    }

    #[must_use]
    pub fn with_postcodes(mut self, postcodes: Arc<dyn PostcodesDataService>) -> Self {
        self.postcodes = Some(postcodes);
        self
    }

    #[must_use]
    pub fn with_lars(mut self, lars: Arc<dyn LarsDataService>) -> Self {
        self.lars = Some(lars);
        self
    }

    #[must_use]
    pub fn with_fcs(mut self, fcs: Arc<dyn FcsDataService>) -> Self {
        self.fcs = Some(fcs);
        self
    }

    #[must_use]
    pub fn with_organisations(mut self, organisations: Arc<dyn OrganisationDataService>) -> Self {
        self.organisations = Some(organisations);
        self
    }

    /// UKPRN of the provider submitting the batch.
    #[must_use]
    pub fn with_ukprn(mut self, ukprn: Option<i64>) -> Self {
        self.ukprn = ukprn;
        self
    }

    pub fn settings(&self) -> &RuleSettings {
        &self.settings
    }

    pub fn calendar(&self) -> &dyn AcademicYearDataService {
        self.calendar.as_ref()
    }

    pub fn postcodes(&self) -> Option<&dyn PostcodesDataService> {
        self.postcodes.as_deref()
    }

    pub fn lars(&self) -> Option<&dyn LarsDataService> {
        self.lars.as_deref()
    }

    pub fn fcs(&self) -> Option<&dyn FcsDataService> {
        self.fcs.as_deref()
    }

    pub fn organisations(&self) -> Option<&dyn OrganisationDataService> {
        self.organisations.as_deref()
    }

    pub fn ukprn(&self) -> Option<i64> {
        self.ukprn
    }

    pub fn satisfies(&self, requirement: Requirement) -> bool {
        match requirement {
            Requirement::Postcodes => self.postcodes.is_some(),
            Requirement::Lars => self.lars.is_some(),
            Requirement::Fcs => self.fcs.is_some(),
            Requirement::Organisations => self.organisations.is_some(),
            Requirement::ProviderUkprn => self.ukprn.is_some(),
            Requirement::Setting(key) => self.settings.contains(key),
        }
    }
}

impl std::fmt::Debug for Toolbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Toolbox")
            .field("settings_version", &self.settings.version())
            .field("academic_year", &self.settings.academic_year())
            .field("postcodes", &self.postcodes.is_some())
            .field("lars", &self.lars.is_some())
            .field("fcs", &self.fcs.is_some())
            .field("organisations", &self.organisations.is_some())
            .field("ukprn", &self.ukprn)
            .finish()
    }
}
