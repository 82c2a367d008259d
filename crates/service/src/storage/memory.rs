use std::collections::{hash_map::Entry, HashMap};

use async_trait::async_trait;
use models::{Contact, EditContact};

use super::{apply_fav_action, filter_contacts, ContactStorage, FilterField};
use crate::errors::StoreError;

/// Process-lifetime store keyed by contact id.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    contacts: HashMap<String, Contact>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Contact, StoreError> {
        self.contacts.get_mut(id).ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl ContactStorage for MemoryStorage {
    async fn list(&self) -> Result<Vec<Contact>, StoreError> {
        Ok(self.contacts.values().cloned().collect())
    }

    async fn add(&mut self, contact: Contact) -> Result<(), StoreError> {
        match self.contacts.entry(contact.id.clone()) {
            Entry::Occupied(e) => Err(StoreError::AlreadyExists(e.key().clone())),
            Entry::Vacant(e) => {
                e.insert(contact);
                Ok(())
            }
        }
    }

    async fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        self.contacts
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn edit(&mut self, patch: EditContact) -> Result<Contact, StoreError> {
        let contact = self.get_mut(&patch.id)?;
        contact.apply_patch(&patch);
        Ok(contact.clone())
    }

    async fn filter(&self, field: &str, value: &str) -> Result<Vec<Contact>, StoreError> {
        let field = FilterField::parse(field)?;
        Ok(filter_contacts(self.contacts.values().cloned(), field, value))
    }

    async fn list_favs(&self) -> Result<Vec<Contact>, StoreError> {
        Ok(self.contacts.values().filter(|c| c.favorite).cloned().collect())
    }

    async fn change_favs(&mut self, id: &str, action: &str) -> Result<(), StoreError> {
        apply_fav_action(self.get_mut(id)?, action)
    }
}
