use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::learner::Learner;

/// A provider submission: the learners to validate plus the submitting provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnerBatch {
    #[serde(default)]
    pub ukprn: Option<i64>,
    #[serde(default)]
    pub learners: Vec<Learner>,
}

impl LearnerBatch {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn len(&self) -> usize {
        self.learners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.learners.is_empty()
    }
}
