// Copyright (c) 2025 Hogar contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Failure classes surfaced by the validation and store layers.
///
/// `Read` and `Write` are kept apart because a failed write of a new record
/// is not safe to retry blindly (it may have landed), while reads and
/// updates are.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("{what} '{key}' not found")]
    NotFound { what: &'static str, key: String },

    #[error("month {year}-{month:02} is closed; reopen it with 'hogar month reopen --month {year}-{month:02}'")]
    ClosedMonth { year: i32, month: u32 },

    #[error("read failed: {0}")]
    Read(#[source] rusqlite::Error),

    #[error("write failed: {0}")]
    Write(#[source] rusqlite::Error),

    #[error("serialization failed: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0}")]
    Service(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    pub fn not_found(what: &'static str, key: impl ToString) -> Self {
        Error::NotFound {
            what,
            key: key.to_string(),
        }
    }
}
