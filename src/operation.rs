//! The contract every GitHub operation implements.
//!
//! An operation is built by an async factory ([`Operation::connect`]) that
//! resolves its repository once; a failed resolution never yields a value,
//! so an unresolved operation cannot be invoked. After construction the
//! operation is immutable and may be invoked concurrently.
//!
//! Parameters are typed per operation. Optional filters are `Option`s that
//! are skipped when serialized, so GitHub applies its own defaults for
//! anything the caller did not specify.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::config::GithubConfig;
use crate::error::{GithubOpsError, RemoteError, Result};
use crate::repository::RepositoryHandle;
use crate::resolver::resolve_repository;

pub type JsonObject = serde_json::Map<String, Value>;

/// What an operation hands back: one object, or a materialized sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OperationOutput {
    Item(Value),
    Items(Vec<Value>),
}

impl OperationOutput {
    pub fn into_value(self) -> Value {
        match self {
            OperationOutput::Item(value) => value,
            OperationOutput::Items(items) => Value::Array(items),
        }
    }

    /// The elements of a sequence result; `None` for a single object.
    pub fn items(&self) -> Option<&[Value]> {
        match self {
            OperationOutput::Item(_) => None,
            OperationOutput::Items(items) => Some(items),
        }
    }

    pub fn item(&self) -> Option<&Value> {
        match self {
            OperationOutput::Item(value) => Some(value),
            OperationOutput::Items(_) => None,
        }
    }
}

/// Static description of an operation: its tool name, a human description,
/// and the JSON schema of its parameters.
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Arc<JsonObject>,
}

impl ToolDescriptor {
    pub fn for_params<P: schemars::JsonSchema>(
        name: &'static str,
        description: &'static str,
    ) -> Self {
        let input_schema = match serde_json::to_value(schemars::schema_for!(P)) {
            Ok(Value::Object(map)) => map,
            _ => JsonObject::new(),
        };
        Self {
            name,
            description,
            input_schema: Arc::new(input_schema),
        }
    }

    pub fn to_tool(&self) -> rmcp::model::Tool {
        rmcp::model::Tool::new(self.name, self.description, self.input_schema.clone())
    }
}

/// State every operation is constructed with.
#[derive(Debug, Clone)]
pub struct OperationBase {
    repo: RepositoryHandle,
    max_results: usize,
}

impl OperationBase {
    pub fn new(repo: RepositoryHandle, max_results: usize) -> Self {
        Self { repo, max_results }
    }

    pub fn repo(&self) -> &RepositoryHandle {
        &self.repo
    }

    /// The caller's cap if given, the configured default otherwise.
    pub fn cap(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.max_results)
    }
}

#[async_trait::async_trait]
pub trait Operation: Send + Sync + Sized + 'static {
    type Params: DeserializeOwned + schemars::JsonSchema + Send + 'static;

    const NAME: &'static str;
    const DESCRIPTION: &'static str;

    fn new(base: OperationBase) -> Self;

    fn base(&self) -> &OperationBase;

    async fn call(&self, params: Self::Params) -> Result<OperationOutput, RemoteError>;

    fn describe() -> ToolDescriptor {
        ToolDescriptor::for_params::<Self::Params>(Self::NAME, Self::DESCRIPTION)
    }

    /// Resolve the configured repository and bind a new operation to it.
    async fn connect(config: &GithubConfig) -> Result<Self> {
        let repo = resolve_repository(config).await?;
        Ok(Self::new(OperationBase::new(repo, config.max_results)))
    }
}

/// Object-safe view of an [`Operation`], taking untyped host arguments.
#[async_trait::async_trait]
pub trait DynOperation: Send + Sync {
    fn descriptor(&self) -> ToolDescriptor;

    async fn invoke(&self, arguments: JsonObject) -> Result<OperationOutput>;
}

#[async_trait::async_trait]
impl<O: Operation> DynOperation for O {
    fn descriptor(&self) -> ToolDescriptor {
        O::describe()
    }

    async fn invoke(&self, arguments: JsonObject) -> Result<OperationOutput> {
        let params: O::Params = serde_json::from_value(Value::Object(arguments)).map_err(|e| {
            GithubOpsError::InvalidParams {
                operation: O::NAME.to_string(),
                message: e.to_string(),
            }
        })?;

        tracing::debug!(
            operation = O::NAME,
            repo = self.base().repo().full_name(),
            "Invoking operation"
        );

        self.call(params).await.map_err(|failure| {
            tracing::warn!(operation = O::NAME, status = ?failure.status, "GitHub call failed");
            GithubOpsError::RemoteOperation {
                operation: O::NAME.to_string(),
                failure,
            }
        })
    }
}

/// Serialize a label list the way GitHub's query strings expect it.
pub(crate) fn comma_separated<S: Serializer>(
    values: &Option<Vec<String>>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match values {
        Some(values) => serializer.serialize_str(&values.join(",")),
        None => serializer.serialize_none(),
    }
}
