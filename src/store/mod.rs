//! Parameter store access
//!
//! The rest of the crate only needs one capability from the store: fetch a
//! batch of parameters by name, decrypting SecureStrings. [`ParameterStore`]
//! is that capability; [`SsmClient`] talks to AWS and [`MemoryStore`] is an
//! in-process fake.

pub mod memory;
pub mod ssm;

use std::future::Future;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::FetchError;

pub use memory::MemoryStore;
pub use ssm::SsmClient;

/// SSM parameter type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterType {
    String,
    StringList,
    SecureString,
    #[serde(other)]
    Unknown,
}

/// A resolved parameter. Only `name` and `value` are interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Parameter {
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ParameterType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(rename = "ARN", default, skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,
    /// Seconds since the epoch, as SSM reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_date: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
}

impl Parameter {
    /// A plain `String` parameter with no other metadata
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            kind: Some(ParameterType::String),
            version: None,
            arn: None,
            last_modified_date: None,
            data_type: None,
        }
    }
}

/// Response of one batch get
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetParametersOutput {
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Names the store could not resolve
    #[serde(default)]
    pub invalid_parameters: Vec<String>,
}

/// Batch "get parameters by name" against a remote store
pub trait ParameterStore {
    fn get_parameters(
        &self,
        names: &[String],
        with_decryption: bool,
    ) -> impl Future<Output = Result<GetParametersOutput, FetchError>> + Send;
}

/// Fetch `paths` in a single request, with decryption.
///
/// Names the store cannot resolve are missing from the result and only
/// logged. Any store failure is returned as-is; there is no retry.
pub async fn fetch_parameters<S>(store: &S, paths: &[String]) -> Result<Vec<Parameter>, FetchError>
where
    S: ParameterStore + Sync,
{
    debug!(count = paths.len(), ?paths, "Fetching parameters");

    let output = store.get_parameters(paths, true).await?;

    if !output.invalid_parameters.is_empty() {
        warn!(names = ?output.invalid_parameters, "Parameters not found in store");
    }
    debug!(count = output.parameters.len(), "Fetched parameters");

    Ok(output.parameters)
}
