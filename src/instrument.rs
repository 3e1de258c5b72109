//! Composable instrumentation for store-mutating operations.
//!
//! An [`Operation`] is any async call that can be wrapped. Two wrappers are
//! provided and both are operations themselves, so they nest in any order:
//!
//! - [`with_counting`] increments the counter `{name}` before every call.
//! - [`with_history`] appends the rendered arguments to `{name}:inputs`
//!   before the call and the rendered result to `{name}:outputs` after it.
//!
//! # Example
//!
//! ```ignore
//! let op = with_history(
//!     with_counting(StoreValue::new(store.clone()), store.clone(), "Cache.store"),
//!     store.clone(),
//!     "Cache.store",
//! );
//! let key = op.call(Value::from("foo")).await?;
//! ```

use async_trait::async_trait;
use std::fmt::Display;
use std::sync::Arc;

use crate::error::CacheError;
use crate::store::Store;
use crate::utils::build_key;
use crate::value::CallArgs;

/// Key of the list holding rendered inputs for `operation`.
pub fn inputs_key(operation: &str) -> String {
    build_key(&operation, &"inputs")
}

/// Key of the list holding rendered outputs for `operation`.
pub fn outputs_key(operation: &str) -> String {
    build_key(&operation, &"outputs")
}

/// An async call that instrumentation can wrap.
#[async_trait]
pub trait Operation: Send + Sync {
    type Input: Send + 'static;
    type Output: Send + 'static;

    async fn call(&self, input: Self::Input) -> Result<Self::Output, CacheError>;
}

/// Operation wrapper that counts invocations under `name`.
pub struct Counted<O> {
    inner: O,
    store: Arc<dyn Store>,
    name: String,
}

/// Operation wrapper that records inputs and outputs under `name`.
pub struct Recorded<O> {
    inner: O,
    store: Arc<dyn Store>,
    name: String,
    inputs_key: String,
    outputs_key: String,
}

/// Wrap `op` so every call increments the counter `name` first.
///
/// The increment happens even if the wrapped call then fails.
pub fn with_counting<O: Operation>(
    op: O,
    store: Arc<dyn Store>,
    name: impl Into<String>,
) -> Counted<O> {
    Counted {
        inner: op,
        store,
        name: name.into(),
    }
}

/// Wrap `op` so every call is recorded in the `name:inputs` / `name:outputs` lists.
///
/// The input is appended before the call and the output after it. A failed
/// call leaves its input without an output.
pub fn with_history<O>(op: O, store: Arc<dyn Store>, name: impl Into<String>) -> Recorded<O>
where
    O: Operation,
    O::Input: CallArgs,
    O::Output: Display,
{
    let name = name.into();
    Recorded {
        inner: op,
        store,
        inputs_key: inputs_key(&name),
        outputs_key: outputs_key(&name),
        name,
    }
}

impl<O> Counted<O> {
    /// The counter key this wrapper increments.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<O> Recorded<O> {
    /// The operation name the history lists are derived from.
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl<O: Operation> Operation for Counted<O> {
    type Input = O::Input;
    type Output = O::Output;

    async fn call(&self, input: Self::Input) -> Result<Self::Output, CacheError> {
        let count = self.store.incr(&self.name).await?;
        tracing::trace!(operation = %self.name, count, "counted call");
        self.inner.call(input).await
    }
}

#[async_trait]
impl<O> Operation for Recorded<O>
where
    O: Operation,
    O::Input: CallArgs,
    O::Output: Display,
{
    type Input = O::Input;
    type Output = O::Output;

    async fn call(&self, input: Self::Input) -> Result<Self::Output, CacheError> {
        let rendered = input.render_args();
        self.store
            .rpush(&self.inputs_key, rendered.into_bytes())
            .await?;

        let output = self.inner.call(input).await?;

        self.store
            .rpush(&self.outputs_key, output.to_string().into_bytes())
            .await?;
        Ok(output)
    }
}
