use std::sync::Arc;

use models::{Contact, EditContact};
use tokio::sync::Mutex;

use crate::errors::StoreError;
use crate::storage::ContactStorage;

/// Process-wide exclusive access to the selected backend.
///
/// Every call holds the lock for the whole storage operation, remote round
/// trips included, so at most one storage operation is in flight at a time.
/// Clones share the same lock and backend.
#[derive(Clone)]
pub struct SerializedStorage {
    inner: Arc<Mutex<Box<dyn ContactStorage>>>,
}

impl SerializedStorage {
    pub fn new<S: ContactStorage + 'static>(storage: S) -> Self {
        Self::from_boxed(Box::new(storage))
    }

    pub fn from_boxed(storage: Box<dyn ContactStorage>) -> Self {
        Self { inner: Arc::new(Mutex::new(storage)) }
    }

    pub async fn list(&self) -> Result<Vec<Contact>, StoreError> {
        self.inner.lock().await.list().await
    }

    pub async fn add(&self, contact: Contact) -> Result<(), StoreError> {
        self.inner.lock().await.add(contact).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.inner.lock().await.delete(id).await
    }

    pub async fn edit(&self, patch: EditContact) -> Result<Contact, StoreError> {
        self.inner.lock().await.edit(patch).await
    }

    pub async fn filter(&self, field: &str, value: &str) -> Result<Vec<Contact>, StoreError> {
        self.inner.lock().await.filter(field, value).await
    }

    pub async fn list_favs(&self) -> Result<Vec<Contact>, StoreError> {
        self.inner.lock().await.list_favs().await
    }

    pub async fn change_favs(&self, id: &str, action: &str) -> Result<(), StoreError> {
        self.inner.lock().await.change_favs(id, action).await
    }
}
