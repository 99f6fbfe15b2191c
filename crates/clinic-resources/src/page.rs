//! One page of a collection listing.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A page of entities plus the totals needed for pagination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_index: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn empty(page_index: u32, page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            page_index,
            page_size,
            total_items: 0,
            total_pages: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page_index: self.page_index,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}

fn pages_for(total_items: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    u32::try_from(total_items.div_ceil(u64::from(page_size))).unwrap_or(u32::MAX)
}

impl<T: DeserializeOwned> Page<T> {
    /// Decode a listing response.
    ///
    /// Accepts the paged shape `{content, totalElements, totalPages}` and,
    /// for endpoints that return everything at once, a bare array (treated
    /// as a single page). Missing totals are derived from the items.
    pub fn from_value(value: Value, page_index: u32, page_size: u32) -> serde_json::Result<Self> {
        match value {
            Value::Array(items) => {
                let items: Vec<T> = serde_json::from_value(Value::Array(items))?;
                let total_items = items.len() as u64;
                Ok(Self {
                    page_index: 0,
                    page_size: page_size.max(u32::try_from(items.len()).unwrap_or(u32::MAX)),
                    total_items,
                    total_pages: u32::from(total_items > 0),
                    items,
                })
            }
            Value::Null => Ok(Self::empty(page_index, page_size)),
            other => {
                let raw: RawPage<T> = serde_json::from_value(other)?;
                let items = raw.content;
                let total_items = raw.total_elements.unwrap_or(items.len() as u64);
                let page_size = raw.size.filter(|s| *s > 0).unwrap_or(page_size);
                Ok(Self {
                    page_index: raw.number.unwrap_or(page_index),
                    total_pages: raw
                        .total_pages
                        .unwrap_or_else(|| pages_for(total_items, page_size)),
                    page_size,
                    total_items,
                    items,
                })
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPage<T> {
    #[serde(default = "Vec::new")]
    content: Vec<T>,
    total_elements: Option<u64>,
    total_pages: Option<u32>,
    number: Option<u32>,
    size: Option<u32>,
}
