//! Retrievable text chunk

use serde::{Deserialize, Serialize};

/// An indivisible unit of retrievable text.
///
/// Produced by the external chunking step and never modified afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Stable identifier, `"{source}#{n}"` for chunks loaded from files
    pub id: String,

    pub text: String,
}

impl Chunk {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}
