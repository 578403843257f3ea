//! Error kinds raised while loading tourism data

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("Failed to fetch {name}: {reason}")]
    Fetch { name: String, reason: String },

    #[error("Failed to parse {name}: {reason}")]
    Parse { name: String, reason: String },
}

impl DataError {
    pub fn fetch(name: &str, reason: impl ToString) -> Self {
        DataError::Fetch {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn parse(name: &str, reason: impl ToString) -> Self {
        DataError::Parse {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }
}
