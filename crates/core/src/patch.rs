//! Partial updates expressed as an ordered list of JSON-pointer operations.
//!
//! A patch never touches an entity directly. The caller projects the entity
//! into its patch DTO, the document is folded over an immutable JSON snapshot
//! of that projection, and the result is deserialized and re-validated as a
//! whole. Only a projection that passes validation is handed back, so a
//! partially applied document can never escape this module.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Add,
    Remove,
    Replace,
}

/// One `{op, path, value}` instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOperation {
    pub op: PatchOp,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// An ordered patch document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatchDocument(pub Vec<PatchOperation>);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatchError {
    #[error("invalid path '{0}': must be a JSON pointer below the document root")]
    InvalidPath(String),

    #[error("path '{0}' does not exist")]
    PathNotFound(String),

    #[error("operation '{op:?}' at '{path}' requires a value")]
    MissingValue { op: PatchOp, path: String },
}

impl From<PatchError> for CoreError {
    fn from(err: PatchError) -> Self {
        CoreError::Validation(err.to_string())
    }
}

impl PatchDocument {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fold every operation, in order, over a copy of `snapshot`.
    pub fn apply(&self, snapshot: &Value) -> Result<Value, PatchError> {
        self.0
            .iter()
            .try_fold(snapshot.clone(), |doc, operation| operation.apply(doc))
    }

    /// Apply this document to a projection and re-validate the result.
    ///
    /// `current` is left untouched; on success the patched projection is
    /// returned for the caller to merge and persist.
    pub fn apply_to<T>(&self, current: &T) -> Result<T, CoreError>
    where
        T: Serialize + DeserializeOwned + Validate,
    {
        let snapshot = serde_json::to_value(current)
            .map_err(|e| CoreError::Internal(format!("failed to project for patch: {e}")))?;
        let patched = self.apply(&snapshot)?;
        let projection: T = serde_json::from_value(patched)
            .map_err(|e| CoreError::Validation(format!("patched document is invalid: {e}")))?;
        projection.validate()?;
        Ok(projection)
    }
}

impl PatchOperation {
    fn apply(&self, mut doc: Value) -> Result<Value, PatchError> {
        let tokens = parse_pointer(&self.path)?;
        let (last, parents) = tokens
            .split_last()
            .ok_or_else(|| PatchError::InvalidPath(self.path.clone()))?;

        let not_found = || PatchError::PathNotFound(self.path.clone());
        let mut target = &mut doc;
        for token in parents {
            target = match target {
                Value::Object(map) => map.get_mut(token.as_str()),
                Value::Array(items) => array_index(token, items.len())
                    .ok()
                    .and_then(|i| items.get_mut(i)),
                _ => None,
            }
            .ok_or_else(not_found)?;
        }

        match self.op {
            PatchOp::Add => {
                let value = self.required_value()?;
                match target {
                    Value::Object(map) => {
                        map.insert(last.clone(), value);
                    }
                    Value::Array(items) if last == "-" => items.push(value),
                    Value::Array(items) => {
                        let index = array_index(last, items.len() + 1).map_err(|_| not_found())?;
                        items.insert(index, value);
                    }
                    _ => return Err(not_found()),
                }
            }
            PatchOp::Remove => match target {
                Value::Object(map) => {
                    map.remove(last.as_str()).ok_or_else(not_found)?;
                }
                Value::Array(items) => {
                    let index = array_index(last, items.len()).map_err(|_| not_found())?;
                    items.remove(index);
                }
                _ => return Err(not_found()),
            },
            PatchOp::Replace => {
                let value = self.required_value()?;
                let slot = match target {
                    Value::Object(map) => map.get_mut(last.as_str()),
                    Value::Array(items) => array_index(last, items.len())
                        .ok()
                        .and_then(|i| items.get_mut(i)),
                    _ => None,
                }
                .ok_or_else(not_found)?;
                *slot = value;
            }
        }
        Ok(doc)
    }

    fn required_value(&self) -> Result<Value, PatchError> {
        self.value.clone().ok_or_else(|| PatchError::MissingValue {
            op: self.op,
            path: self.path.clone(),
        })
    }
}

/// Split an RFC 6901 pointer into unescaped reference tokens.
fn parse_pointer(path: &str) -> Result<Vec<String>, PatchError> {
    let rest = path
        .strip_prefix('/')
        .ok_or_else(|| PatchError::InvalidPath(path.to_string()))?;
    Ok(rest
        .split('/')
        .map(|token| token.replace("~1", "/").replace("~0", "~"))
        .collect())
}

/// Parse an array index token that must be below `bound`.
fn array_index(token: &str, bound: usize) -> Result<usize, ()> {
    if token.len() > 1 && token.starts_with('0') {
        return Err(());
    }
    match token.parse::<usize>() {
        Ok(index) if index < bound => Ok(index),
        _ => Err(()),
    }
}
