pub mod batch;
pub mod error;
pub mod ids;
pub mod learner;
pub mod violation;

pub use batch::LearnerBatch;
pub use error::{ModelError, Result};
pub use ids::{LearnRefNumber, RuleId};
pub use learner::{Learner, LearningDelivery, Marker};
pub use violation::{
    PARAMETER_DATE_FORMAT, RuleTally, Severity, Violation, ViolationParameter, ViolationSummary,
};
