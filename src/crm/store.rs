use crate::error::CrmResult;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// A CRM object: an id plus string-valued properties
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrmRecord {
    pub id: String,
    #[serde(default)]
    pub properties: HashMap<String, Option<String>>,
}

impl CrmRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            properties: HashMap::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.properties.insert(key.to_string(), Some(value.into()));
        self
    }

    /// Non-blank property value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties
            .get(key)
            .and_then(|v| v.as_deref())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get(key).map(str::to_string)
    }

    /// Money property. CRMs export currency with symbols and separators.
    pub fn get_decimal(&self, key: &str) -> Option<Decimal> {
        let cleaned: String = self
            .get(key)?
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
            .collect();
        Decimal::from_str(&cleaned).ok()
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key)?.replace(',', "").parse::<f64>().ok()
    }

    pub fn get_u32(&self, key: &str) -> Option<u32> {
        self.get_f64(key)
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| v.round() as u32)
    }

    /// Semicolon-separated list property (multi-file fields)
    pub fn get_list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .map(|v| {
                v.split(';')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Comparison used in a search filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterOperator {
    Eq,
    Neq,
    HasProperty,
}

/// One property filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    pub property_name: String,
    pub operator: FilterOperator,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Filter {
    pub fn eq(property: &str, value: impl Into<String>) -> Self {
        Self {
            property_name: property.to_string(),
            operator: FilterOperator::Eq,
            value: Some(value.into()),
        }
    }

    pub fn has_property(property: &str) -> Self {
        Self {
            property_name: property.to_string(),
            operator: FilterOperator::HasProperty,
            value: None,
        }
    }

    /// Whether a record satisfies this filter
    pub fn matches(&self, record: &CrmRecord) -> bool {
        let actual = record.get(&self.property_name);
        match self.operator {
            FilterOperator::Eq => match (actual, self.value.as_deref()) {
                (Some(a), Some(v)) => a.eq_ignore_ascii_case(v),
                _ => false,
            },
            FilterOperator::Neq => match (actual, self.value.as_deref()) {
                (Some(a), Some(v)) => !a.eq_ignore_ascii_case(v),
                (None, _) => true,
                (Some(_), None) => true,
            },
            FilterOperator::HasProperty => actual.is_some(),
        }
    }
}

/// Object search: all filters must match
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchRequest {
    pub filters: Vec<Filter>,
    pub properties: Vec<String>,
    pub limit: usize,
}

impl SearchRequest {
    pub fn new(properties: &[&str]) -> Self {
        Self {
            filters: Vec::new(),
            properties: properties.iter().map(|p| p.to_string()).collect(),
            limit: 100,
        }
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn matches(&self, record: &CrmRecord) -> bool {
        self.filters.iter().all(|f| f.matches(record))
    }
}

/// Query and create access to CRM objects
#[async_trait]
pub trait CrmStore: Send + Sync {
    /// Search records of an object type
    async fn search(&self, object_type: &str, request: &SearchRequest) -> CrmResult<Vec<CrmRecord>>;

    /// Fetch one record by id; `None` when it does not exist
    async fn get(
        &self,
        object_type: &str,
        id: &str,
        properties: &[&str],
    ) -> CrmResult<Option<CrmRecord>>;

    /// Create a record and return it with its new id
    async fn create(
        &self,
        object_type: &str,
        properties: HashMap<String, String>,
    ) -> CrmResult<CrmRecord>;

    /// Short-lived download URL for a file attachment
    async fn file_url(&self, file_id: &str) -> CrmResult<Option<String>>;
}
