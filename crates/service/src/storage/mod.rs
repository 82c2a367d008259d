//! Storage contract for the contact directory
//!
//! Every backend implements [`ContactStorage`] with identical error semantics.
//! Mutating calls take `&mut self`: a backend owns its medium outright and the
//! caller's exclusive lock ([`crate::serializer::SerializedStorage`]) is the
//! only synchronisation.

pub mod memory;
pub mod file;
pub mod elastic;

use async_trait::async_trait;
use models::{Contact, EditContact};

use crate::errors::StoreError;

#[async_trait]
pub trait ContactStorage: Send + Sync {
    /// Full, unordered snapshot.
    async fn list(&self) -> Result<Vec<Contact>, StoreError>;
    /// Insert a fully formed record. Duplicate ids are rejected.
    async fn add(&mut self, contact: Contact) -> Result<(), StoreError>;
    async fn delete(&mut self, id: &str) -> Result<(), StoreError>;
    /// Partial patch; returns the resulting record.
    async fn edit(&mut self, patch: EditContact) -> Result<Contact, StoreError>;
    /// Case-insensitive substring match on `name` or `phone`.
    async fn filter(&self, field: &str, value: &str) -> Result<Vec<Contact>, StoreError>;
    async fn list_favs(&self) -> Result<Vec<Contact>, StoreError>;
    /// `action` is `add` or `remove`; the id is checked first.
    async fn change_favs(&mut self, id: &str, action: &str) -> Result<(), StoreError>;
}

/// Fields a filter may target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Name,
    Phone,
}

impl FilterField {
    pub fn parse(field: &str) -> Result<Self, StoreError> {
        match field {
            "name" => Ok(FilterField::Name),
            "phone" => Ok(FilterField::Phone),
            other => Err(StoreError::FilterWrongFormat(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterField::Name => "name",
            FilterField::Phone => "phone",
        }
    }

    fn value_of<'a>(&self, contact: &'a Contact) -> &'a str {
        match self {
            FilterField::Name => &contact.name,
            FilterField::Phone => &contact.phone,
        }
    }

    /// `needle` must already be lowercase.
    pub fn matches(&self, contact: &Contact, needle: &str) -> bool {
        self.value_of(contact).to_lowercase().contains(needle)
    }
}

/// Keep the records whose `field` contains `value`, ignoring case.
pub fn filter_contacts<I>(contacts: I, field: FilterField, value: &str) -> Vec<Contact>
where
    I: IntoIterator<Item = Contact>,
{
    let needle = value.to_lowercase();
    contacts.into_iter().filter(|c| field.matches(c, &needle)).collect()
}

/// Favorite toggle transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavAction {
    Add,
    Remove,
}

impl FavAction {
    pub fn parse(action: &str) -> Result<Self, StoreError> {
        match action {
            "add" => Ok(FavAction::Add),
            "remove" => Ok(FavAction::Remove),
            other => Err(StoreError::WrongActionFormat(other.to_string())),
        }
    }
}

/// Run the favorite state machine on a record that is known to exist.
pub fn apply_fav_action(contact: &mut Contact, action: &str) -> Result<(), StoreError> {
    match (FavAction::parse(action)?, contact.favorite) {
        (FavAction::Add, true) => Err(StoreError::AlreadyFavorite(contact.id.clone())),
        (FavAction::Remove, false) => Err(StoreError::AlreadyNotFavorite(contact.id.clone())),
        (FavAction::Add, false) => {
            contact.favorite = true;
            Ok(())
        }
        (FavAction::Remove, true) => {
            contact.favorite = false;
            Ok(())
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_field_parse() {
        assert_eq!(FilterField::parse("name").unwrap(), FilterField::Name);
        assert_eq!(FilterField::parse("phone").unwrap(), FilterField::Phone);
        assert!(matches!(FilterField::parse("Name"), Err(StoreError::FilterWrongFormat(_))));
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let contacts = vec![contract_tests::alice(), contract_tests::bob()];
        let hits = filter_contacts(contacts, FilterField::Name, "bObBy");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "2");
    }

    #[test]
    fn fav_action_rejects_unknown() {
        let mut c = contract_tests::alice();
        assert!(matches!(apply_fav_action(&mut c, ""), Err(StoreError::WrongActionFormat(_))));
        assert!(!c.favorite);
        apply_fav_action(&mut c, "add").unwrap();
        assert!(c.favorite);
    }
}
