//! Entity bound and the paged list type.
//!
//! # Design
//! The client imposes nothing on entities beyond JSON (de)serialization.
//! `PagedResult` is the single normalized list shape: a bare JSON array and
//! a wrapper object both decode into it.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Any record that can be exchanged with the API.
///
/// Blanket-implemented; the `Send + 'static` part lets blocking calls move
/// decoding onto the dedicated runtime.
pub trait Entity: Serialize + DeserializeOwned + Send + 'static {}

impl<T> Entity for T where T: Serialize + DeserializeOwned + Send + 'static {}

/// A list of entities with optional paging metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_records: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub succeeded: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub info: Vec<String>,
    #[serde(default)]
    pub list: Vec<T>,
}

impl<T> PagedResult<T> {
    /// Wrap a bare list. `total_records` is the list length and the paging
    /// fields stay unset.
    pub fn from_items(items: Vec<T>) -> Self {
        Self {
            total_records: Some(items.len() as i64),
            page: None,
            per_page: None,
            succeeded: None,
            info: Vec::new(),
            list: items,
        }
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.list.iter()
    }

    pub fn into_items(self) -> Vec<T> {
        self.list
    }
}

impl<T> Default for PagedResult<T> {
    fn default() -> Self {
        Self {
            total_records: None,
            page: None,
            per_page: None,
            succeeded: None,
            info: Vec::new(),
            list: Vec::new(),
        }
    }
}

impl<T> IntoIterator for PagedResult<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.into_iter()
    }
}

/// Wire shape of a list wrapped in an object. `list` is optional here so
/// that an object without one can be reported as "no list" rather than as a
/// schema error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListEnvelope<T> {
    pub total_records: Option<i64>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub succeeded: Option<bool>,
    #[serde(default)]
    pub info: Option<Vec<String>>,
    pub list: Option<Vec<T>>,
}

impl<T> ListEnvelope<T> {
    /// `None` when the object carried no list.
    pub fn into_paged(self) -> Option<PagedResult<T>> {
        let list = self.list?;
        Some(PagedResult {
            total_records: self.total_records,
            page: self.page,
            per_page: self.per_page,
            succeeded: self.succeeded,
            info: self.info.unwrap_or_default(),
            list,
        })
    }
}
