//! Rule contract and the data-driven rule definition.
//!
//! Every rule implements [`Rule`]. Catalogue rules are [`RuleDefinition`]
//! values: an identifier, a severity, the collaborators the rule needs and a
//! [`RuleBody`] made of plain function pointers.
//!
//! Evaluation for one learner:
//!
//! 1. exclude: when it holds nothing is reported;
//! 2. condition: a pure predicate over the learner (or one delivery);
//! 3. report: one violation with the rule id, learner key, delivery key
//!    (delivery scope only) and the rule's formatted parameters.
//!
//! A business failure is a violation, never a panic or an error.

use std::fmt;

use ilr_derive::DerivedData;
use ilr_model::{Learner, LearningDelivery, RuleId, Severity, ViolationParameter};
use ilr_reference::{AcademicYearDataService, RuleSettings, SettingKey};

use crate::sink::ViolationSink;
use crate::toolbox::Toolbox;

/// A collaborator a rule needs from the [`Toolbox`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Requirement {
    Postcodes,
    Lars,
    Fcs,
    Organisations,
    ProviderUkprn,
    Setting(SettingKey),
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Postcodes => f.write_str("postcodes data service"),
            Self::Lars => f.write_str("LARS data service"),
            Self::Fcs => f.write_str("FCS data service"),
            Self::Organisations => f.write_str("organisation data service"),
            Self::ProviderUkprn => f.write_str("provider UKPRN"),
            Self::Setting(key) => write!(f, "setting {key}"),
        }
    }
}

/// How many violations a delivery-scoped rule reports per learner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Emission {
    /// One violation per qualifying delivery.
    #[default]
    EveryItem,
    /// Stop at the first qualifying delivery.
    FirstItem,
}

/// Everything a rule may consult while evaluating one learner.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    toolbox: &'a Toolbox,
    derived: DerivedData<'a>,
}

impl<'a> EvalContext<'a> {
    pub fn new(toolbox: &'a Toolbox, derived: DerivedData<'a>) -> Self {
        Self { toolbox, derived }
    }

    pub fn toolbox(&self) -> &'a Toolbox {
        self.toolbox
    }

    pub fn derived(&self) -> &DerivedData<'a> {
        &self.derived
    }

    pub fn settings(&self) -> &'a RuleSettings {
        self.toolbox.settings()
    }

    pub fn calendar(&self) -> &'a dyn AcademicYearDataService {
        self.toolbox.calendar()
    }
}

pub type LearnerPredicate = fn(&EvalContext<'_>, &Learner) -> bool;
pub type DeliveryPredicate = fn(&EvalContext<'_>, &Learner, &LearningDelivery) -> bool;
pub type LearnerParameters = fn(&EvalContext<'_>, &Learner) -> Vec<ViolationParameter>;
pub type DeliveryParameters =
    fn(&EvalContext<'_>, &Learner, &LearningDelivery) -> Vec<ViolationParameter>;

/// The uniform shape every rule implements.
pub trait Rule: Send + Sync {
    fn id(&self) -> &RuleId;

    fn severity(&self) -> Severity;

    /// Collaborators checked when the rule set is composed.
    fn requires(&self) -> &[Requirement];

    fn description(&self) -> &str {
        ""
    }

    /// Evaluate the rule against one learner, reporting into `sink`.
    fn validate(&self, ctx: &EvalContext<'_>, learner: &Learner, sink: &mut dyn ViolationSink);
}

#[derive(Debug, Clone)]
pub enum RuleBody {
    /// Learner-scoped: the condition runs once per learner.
    Learner {
        exclude: Option<LearnerPredicate>,
        condition: LearnerPredicate,
        parameters: LearnerParameters,
    },
    /// Delivery-scoped: exclude and condition run per delivery.
    Delivery {
        /// Learner-level early-out, e.g. "no learning deliveries".
        exclude_learner: Option<LearnerPredicate>,
        exclude: Option<DeliveryPredicate>,
        condition: DeliveryPredicate,
        parameters: DeliveryParameters,
        emission: Emission,
    },
}

#[derive(Debug, Clone)]
pub struct RuleDefinition {
    id: RuleId,
    severity: Severity,
    description: &'static str,
    requires: Vec<Requirement>,
    body: RuleBody,
}

impl RuleDefinition {
    pub fn learner(
        id: &'static str,
        condition: LearnerPredicate,
        parameters: LearnerParameters,
    ) -> Self {
        Self::with_body(
            id,
            RuleBody::Learner {
                exclude: None,
                condition,
                parameters,
            },
        )
    }

    pub fn delivery(
        id: &'static str,
        condition: DeliveryPredicate,
        parameters: DeliveryParameters,
    ) -> Self {
        Self::with_body(
            id,
            RuleBody::Delivery {
                exclude_learner: None,
                exclude: None,
                condition,
                parameters,
                emission: Emission::EveryItem,
            },
        )
    }

    pub fn with_body(id: &'static str, body: RuleBody) -> Self {
        Self {
            id: RuleId::from_static(id),
            severity: Severity::Error,
            description: "",
            requires: Vec::new(),
            body,
        }
    }

    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    #[must_use]
    pub fn requiring(mut self, requirement: Requirement) -> Self {
        if !self.requires.contains(&requirement) {
            self.requires.push(requirement);
        }
        self
    }

    /// Learner-level exclude, for either scope.
    #[must_use]
    pub fn excluding_learner(mut self, predicate: LearnerPredicate) -> Self {
        match &mut self.body {
            RuleBody::Learner { exclude, .. } => *exclude = Some(predicate),
            RuleBody::Delivery {
                exclude_learner, ..
            } => *exclude_learner = Some(predicate),
        }
        self
    }

    /// Per-delivery exclude. Ignored for learner-scoped rules.
    #[must_use]
    pub fn excluding_delivery(mut self, predicate: DeliveryPredicate) -> Self {
        if let RuleBody::Delivery { exclude, .. } = &mut self.body {
            *exclude = Some(predicate);
        }
        self
    }

    /// Ignored for learner-scoped rules.
    #[must_use]
    pub fn with_emission(mut self, value: Emission) -> Self {
        if let RuleBody::Delivery { emission, .. } = &mut self.body {
            *emission = value;
        }
        self
    }

    pub fn body(&self) -> &RuleBody {
        &self.body
    }
}

impl Rule for RuleDefinition {
    fn id(&self) -> &RuleId {
        &self.id
    }

    fn severity(&self) -> Severity {
        self.severity
    }

    fn requires(&self) -> &[Requirement] {
        &self.requires
    }

    fn description(&self) -> &str {
        self.description
    }

    fn validate(&self, ctx: &EvalContext<'_>, learner: &Learner, sink: &mut dyn ViolationSink) {
        match &self.body {
            RuleBody::Learner {
                exclude,
                condition,
                parameters,
            } => {
                if exclude.is_some_and(|exclude| exclude(ctx, learner)) {
                    return;
                }
                if condition(ctx, learner) {
                    sink.handle(
                        &self.id,
                        &learner.learn_ref_number,
                        None,
                        self.severity,
                        parameters(ctx, learner),
                    );
                }
            }
            RuleBody::Delivery {
                exclude_learner,
                exclude,
                condition,
                parameters,
                emission,
            } => {
                if exclude_learner.is_some_and(|exclude| exclude(ctx, learner)) {
                    return;
                }
                for delivery in learner.deliveries() {
                    if exclude.is_some_and(|exclude| exclude(ctx, learner, delivery)) {
                        continue;
                    }
                    if !condition(ctx, learner, delivery) {
                        continue;
                    }
                    sink.handle(
                        &self.id,
                        &learner.learn_ref_number,
                        Some(delivery.aim_seq_number),
                        self.severity,
                        parameters(ctx, learner, delivery),
                    );
                    if *emission == Emission::FirstItem {
                        break;
                    }
                }
            }
        }
    }
}

/// Learner-level exclude shared by delivery rules.
pub fn no_deliveries(_ctx: &EvalContext<'_>, learner: &Learner) -> bool {
    !learner.has_deliveries()
}
