use std::borrow::Cow;

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Ascending => "asc",
            Direction::Descending => "desc",
        }
    }
}

/// Column a collection is listed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub column: &'static str,
    pub direction: Direction,
}

/// A collection managed through the admin panel.
///
/// Ties the row type to its table, its route segment, its create/patch payloads and the
/// static records served when the store cannot answer.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Fields accepted on create (everything minus id and timestamps).
    type New: Serialize + DeserializeOwned + Validate + Send + Sync + 'static;
    /// Partial update payload.
    type Patch: Serialize + DeserializeOwned + Validate + Default + Send + Sync + 'static;

    const TABLE: &'static str;
    const PATH: &'static str;
    const LABEL: &'static str;
    const ORDER: OrderBy;

    fn id(&self) -> &str;

    fn fallback() -> Vec<Self>;

    /// Normalizes a create payload before validation.
    fn prepare_new(_new: &mut Self::New) -> Result<(), ValidationErrors> {
        Ok(())
    }

    /// Normalizes a patch payload before validation.
    fn prepare_patch(_patch: &mut Self::Patch) -> Result<(), ValidationErrors> {
        Ok(())
    }

    /// Slug that must not already belong to another row.
    fn unique_slug_of_new(_new: &Self::New) -> Option<&str> {
        None
    }

    fn unique_slug_of_patch(_patch: &Self::Patch) -> Option<&str> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Store ids are opaque; accept numeric primary keys as well as uuid/text ones.
pub fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

/// Null or missing arrays from the store read as empty.
pub fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

pub fn new_validation_error(code: &'static str, msg: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(msg));
    err
}
