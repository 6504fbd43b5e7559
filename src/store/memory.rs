//! In-memory parameter store

use std::sync::Mutex;

use super::{GetParametersOutput, Parameter, ParameterStore};
use crate::errors::FetchError;

/// One recorded `get_parameters` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreCall {
    pub names: Vec<String>,
    pub with_decryption: bool,
}

/// Store backed by a fixed list of parameters.
///
/// Unknown names are reported as invalid, like SSM does. A failing store
/// rejects every call with the configured message.
#[derive(Debug, Default)]
pub struct MemoryStore {
    parameters: Vec<Parameter>,
    failure: Option<String>,
    calls: Mutex<Vec<StoreCall>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every call fails
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push(Parameter::new(name, value));
        self
    }

    /// Calls received so far, in order
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    fn resolve(&self, names: &[String]) -> GetParametersOutput {
        let mut output = GetParametersOutput::default();

        for name in names {
            if output.parameters.iter().any(|p| &p.name == name)
                || output.invalid_parameters.contains(name)
            {
                continue;
            }

            match self.parameters.iter().find(|p| &p.name == name) {
                Some(parameter) => output.parameters.push(parameter.clone()),
                None => output.invalid_parameters.push(name.clone()),
            }
        }

        output
    }
}

impl ParameterStore for MemoryStore {
    async fn get_parameters(
        &self,
        names: &[String],
        with_decryption: bool,
    ) -> Result<GetParametersOutput, FetchError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(StoreCall {
                names: names.to_vec(),
                with_decryption,
            });
        }

        match &self.failure {
            Some(message) => Err(FetchError::Other(message.clone())),
            None => Ok(self.resolve(names)),
        }
    }
}
