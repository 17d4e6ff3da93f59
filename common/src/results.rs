use serde::{Deserialize, Serialize};

use crate::task::TaskRecord;

/// Resultados de un batch, uno por target y en el orden de entrada
/// (no en el orden en que terminaron).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunResultSet {
    pub records: Vec<TaskRecord>,
}

impl RunResultSet {
    pub fn new(records: Vec<TaskRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaskRecord> {
        self.records.iter()
    }
}

impl IntoIterator for RunResultSet {
    type Item = TaskRecord;
    type IntoIter = std::vec::IntoIter<TaskRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}
