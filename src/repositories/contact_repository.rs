use crate::crm::{CrmRecord, CrmStore, Filter, SearchRequest};
use crate::error::CrmResult;
use crate::models::Contact;
use std::sync::Arc;

const CONTACT_PROPERTIES: &[&str] = &["email", "firstname", "lastname"];

/// Repository for CRM contacts
pub struct ContactRepository {
    store: Arc<dyn CrmStore>,
    object_type: String,
}

impl ContactRepository {
    /// Create a new ContactRepository
    pub fn new(store: Arc<dyn CrmStore>, object_type: impl Into<String>) -> Self {
        Self {
            store,
            object_type: object_type.into(),
        }
    }

    /// Find a contact by email (case-insensitive)
    pub async fn find_by_email(&self, email: &str) -> CrmResult<Option<Contact>> {
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Ok(None);
        }

        let request = SearchRequest::new(CONTACT_PROPERTIES)
            .filter(Filter::eq("email", email.clone()))
            .limit(1);

        let records = self.store.search(&self.object_type, &request).await?;
        Ok(records.into_iter().next().map(|r| contact_from_record(&r, &email)))
    }
}

fn contact_from_record(record: &CrmRecord, fallback_email: &str) -> Contact {
    Contact {
        id: record.id.clone(),
        email: record
            .get("email")
            .map(str::to_lowercase)
            .unwrap_or_else(|| fallback_email.to_string()),
        first_name: record.get_string("firstname"),
        last_name: record.get_string("lastname"),
    }
}
