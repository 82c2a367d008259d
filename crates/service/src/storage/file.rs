use std::{ffi::OsString, io::ErrorKind, path::PathBuf};

use async_trait::async_trait;
use models::{Contact, EditContact};
use tokio::fs;
use tracing::debug;

use super::{apply_fav_action, filter_contacts, ContactStorage, FilterField};
use crate::errors::StoreError;

/// JSON file-backed contact list.
///
/// The file holds one JSON array of contacts. Each call reads the whole file,
/// works on the decoded list and, for mutations, writes the whole list back.
/// A missing or empty file is an empty directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    file_path: PathBuf,
}

impl FileStorage {
    /// The parent directory must exist; see [`crate::runtime::ensure_data_parent`].
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { file_path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.file_path
    }

    async fn load(&self) -> Result<Vec<Contact>, StoreError> {
        let bytes = match fs::read(&self.file_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        // `null` is what an empty list looked like in older files
        let contacts: Option<Vec<Contact>> = serde_json::from_slice(&bytes)?;
        Ok(contacts.unwrap_or_default())
    }

    /// Write to a sibling temp file, then rename it over the data file.
    async fn save(&self, contacts: &[Contact]) -> Result<(), StoreError> {
        let data = serde_json::to_vec(contacts)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, data).await?;
        fs::rename(&tmp, &self.file_path).await?;
        debug!(path = %self.file_path.display(), count = contacts.len(), "contacts file written");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name: OsString = self
            .file_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| OsString::from("contacts.json"));
        name.push(".tmp");
        self.file_path.with_file_name(name)
    }
}

fn position(contacts: &[Contact], id: &str) -> Result<usize, StoreError> {
    contacts
        .iter()
        .position(|c| c.id == id)
        .ok_or_else(|| StoreError::NotFound(id.to_string()))
}

#[async_trait]
impl ContactStorage for FileStorage {
    async fn list(&self) -> Result<Vec<Contact>, StoreError> {
        self.load().await
    }

    async fn add(&mut self, contact: Contact) -> Result<(), StoreError> {
        let mut contacts = self.load().await?;
        if contacts.iter().any(|c| c.id == contact.id) {
            return Err(StoreError::AlreadyExists(contact.id));
        }
        contacts.push(contact);
        self.save(&contacts).await
    }

    async fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        let mut contacts = self.load().await?;
        let idx = position(&contacts, id)?;
        contacts.remove(idx);
        self.save(&contacts).await
    }

    async fn edit(&mut self, patch: EditContact) -> Result<Contact, StoreError> {
        let mut contacts = self.load().await?;
        let idx = position(&contacts, &patch.id)?;
        contacts[idx].apply_patch(&patch);
        let updated = contacts[idx].clone();
        self.save(&contacts).await?;
        Ok(updated)
    }

    async fn filter(&self, field: &str, value: &str) -> Result<Vec<Contact>, StoreError> {
        let field = FilterField::parse(field)?;
        Ok(filter_contacts(self.load().await?, field, value))
    }

    async fn list_favs(&self) -> Result<Vec<Contact>, StoreError> {
        let mut contacts = self.load().await?;
        contacts.retain(|c| c.favorite);
        Ok(contacts)
    }

    async fn change_favs(&mut self, id: &str, action: &str) -> Result<(), StoreError> {
        let mut contacts = self.load().await?;
        let idx = position(&contacts, id)?;
        apply_fav_action(&mut contacts[idx], action)?;
        self.save(&contacts).await
    }
}
