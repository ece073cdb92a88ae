// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

use crate::storage::Slot;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
    #[error("encoding error: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("could not persist {slot}: {source}")]
    Persist {
        slot: Slot,
        #[source]
        source: Box<StoreError>,
    },
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
