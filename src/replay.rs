//! Replay of recorded call history.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CacheError;
use crate::instrument::{inputs_key, outputs_key};
use crate::store::Store;

/// One recorded call: the rendered argument tuple and the rendered result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRecord {
    pub input: String,
    pub output: String,
}

/// The recorded history of one operation, in call order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replay {
    /// Name the history was recorded under.
    pub operation: String,
    /// Number of recorded inputs, i.e. calls that were started.
    pub total_calls: usize,
    /// Paired calls, truncated to the shorter of the two lists.
    pub calls: Vec<CallRecord>,
    /// Whether the input and output lists had different lengths.
    pub misaligned: bool,
}

impl Replay {
    /// Render the replay as JSON for external tooling.
    pub fn to_json(&self) -> Result<String, CacheError> {
        serde_json::to_string(self)
            .map_err(|e| CacheError::Serialization(format!("Serialization failed: {}", e)))
    }
}

impl fmt::Display for Replay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} was called {} times:", self.operation, self.total_calls)?;
        for call in &self.calls {
            write!(f, "\n{}(*{}) -> {}", self.operation, call.input, call.output)?;
        }
        Ok(())
    }
}

/// Read the recorded history of `operation` from `store`.
///
/// This only reads. A length mismatch between the input and output lists,
/// as left behind by a call that failed midway, is reported through
/// [`Replay::misaligned`] and the pairs are truncated to the shorter list.
pub async fn replay(store: &dyn Store, operation: &str) -> Result<Replay, CacheError> {
    let inputs = store.lrange(&inputs_key(operation), 0, -1).await?;
    let outputs = store.lrange(&outputs_key(operation), 0, -1).await?;

    let misaligned = inputs.len() != outputs.len();
    if misaligned {
        tracing::warn!(
            operation,
            inputs = inputs.len(),
            outputs = outputs.len(),
            "call history is misaligned, truncating to the shorter list"
        );
    }

    let total_calls = inputs.len();
    let calls = inputs
        .into_iter()
        .zip(outputs)
        .map(|(input, output)| CallRecord {
            input: String::from_utf8_lossy(&input).into_owned(),
            output: String::from_utf8_lossy(&output).into_owned(),
        })
        .collect();

    Ok(Replay {
        operation: operation.to_string(),
        total_calls,
        calls,
        misaligned,
    })
}
