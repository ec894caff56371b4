use std::io;

use itertools::Itertools;
use thiserror::Error;

use crate::domain::ExerciseId;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not read `{key}`: {source}")]
    Read {
        key: String,
        #[source]
        source: io::Error,
    },

    #[error("could not write `{key}`: {source}")]
    Write {
        key: String,
        #[source]
        source: io::Error,
    },

    #[error("could not encode `{key}`: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub fn key(&self) -> &str {
        match self {
            StoreError::Read { key, .. }
            | StoreError::Write { key, .. }
            | StoreError::Encode { key, .. } => key,
        }
    }
}

/// Every key of a save is attempted; this collects the ones that failed.
#[derive(Debug, Error)]
#[error("failed to save {}: {}", failed_keys(.failures), first_message(.failures))]
pub struct SaveError {
    pub failures: Vec<StoreError>,
}

fn failed_keys(failures: &[StoreError]) -> String {
    failures.iter().map(StoreError::key).join(", ")
}

fn first_message(failures: &[StoreError]) -> String {
    failures
        .first()
        .map(ToString::to_string)
        .unwrap_or_default()
}

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("unknown exercise `{0}`")]
    UnknownExercise(ExerciseId),

    #[error("cannot remove `{0}`: at least one exercise must remain")]
    LastExercise(ExerciseId),

    #[error("weekday {0} is out of range (0 = Sunday .. 6 = Saturday)")]
    InvalidWeekday(usize),

    #[error(transparent)]
    Save(#[from] SaveError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_error_names_every_failed_key() {
        let failure = |key: &str| StoreError::Write {
            key: key.to_string(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
        };
        let error = SaveError {
            failures: vec![failure("overrides"), failure("tintColors")],
        };
        let message = error.to_string();
        assert!(message.starts_with("failed to save overrides, tintColors: "));
        assert!(message.contains("could not write `overrides`: read-only"));
    }
}
