//! Composed rule sets.

use std::collections::BTreeSet;
use std::sync::Arc;

use ilr_model::RuleId;
use tracing::{debug, info};

use crate::error::CompositionError;
use crate::rule::Rule;
use crate::toolbox::Toolbox;

/// Rules bound to one [`Toolbox`].
///
/// Every requirement of every rule has been checked against the toolbox, and
/// rule identifiers are unique. Rule order carries no meaning.
pub struct RuleSet {
    toolbox: Arc<Toolbox>,
    rules: Vec<Box<dyn Rule>>,
    ids: BTreeSet<RuleId>,
}

impl RuleSet {
    pub fn new(toolbox: Arc<Toolbox>) -> Self {
        Self {
            toolbox,
            rules: Vec::new(),
            ids: BTreeSet::new(),
        }
    }

    /// Bind `rules` to `toolbox`, failing on the first unsatisfied
    /// requirement or duplicate identifier.
    pub fn compose(
        toolbox: Arc<Toolbox>,
        rules: impl IntoIterator<Item = Box<dyn Rule>>,
    ) -> Result<Self, CompositionError> {
        let mut set = Self::new(toolbox);
        for rule in rules {
            set.register(rule)?;
        }
        info!(
            rules = set.len(),
            settings_version = %set.toolbox.settings().version(),
            academic_year = set.toolbox.settings().academic_year(),
            "rule set composed"
        );
        Ok(set)
    }

    pub fn register(&mut self, rule: Box<dyn Rule>) -> Result<(), CompositionError> {
        if self.ids.contains(rule.id()) {
            return Err(CompositionError::DuplicateRule {
                rule_id: rule.id().clone(),
            });
        }
        if let Some(requirement) = rule
            .requires()
            .iter()
            .find(|r| !self.toolbox.satisfies(**r))
        {
            return Err(CompositionError::MissingRequirement {
                rule_id: rule.id().clone(),
                requirement: *requirement,
            });
        }
        debug!(rule_id = %rule.id(), "registered rule");
        self.ids.insert(rule.id().clone());
        self.rules.push(rule);
        Ok(())
    }

    pub fn toolbox(&self) -> &Toolbox {
        &self.toolbox
    }

    pub fn rules(&self) -> impl Iterator<Item = &dyn Rule> + '_ {
        self.rules.iter().map(AsRef::as_ref)
    }

    pub fn get(&self, id: &str) -> Option<&dyn Rule> {
        self.rules().find(|rule| rule.id().as_str() == id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rule_ids(&self) -> impl Iterator<Item = &RuleId> + '_ {
        self.ids.iter()
    }
}

impl std::fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleSet")
            .field("toolbox", &self.toolbox)
            .field("rules", &self.ids)
            .finish()
    }
}
