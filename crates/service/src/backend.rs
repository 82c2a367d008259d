//! Backend factory
//!
//! Builds the one backend selected by configuration. Called once at startup;
//! the result is handed to [`SerializedStorage`] and passed down explicitly.

use configs::{BackendKind, StorageConfig};
use tracing::info;

use crate::runtime;
use crate::serializer::SerializedStorage;
use crate::storage::{elastic::ElasticStorage, file::FileStorage, memory::MemoryStorage, ContactStorage};

pub async fn build_storage(cfg: &StorageConfig) -> anyhow::Result<Box<dyn ContactStorage>> {
    let storage: Box<dyn ContactStorage> = match cfg.backend {
        BackendKind::Memory => {
            info!(backend = %cfg.backend, "store in memory");
            Box::new(MemoryStorage::new())
        }
        BackendKind::File => {
            runtime::ensure_data_parent(&cfg.file_path).await?;
            info!(backend = %cfg.backend, path = %cfg.file_path, "store in local file");
            Box::new(FileStorage::new(&cfg.file_path))
        }
        BackendKind::Elastic => {
            info!(backend = %cfg.backend, url = %cfg.elastic.url, index = %cfg.elastic.index, "store in elasticsearch");
            Box::new(ElasticStorage::new(&cfg.elastic)?)
        }
    };
    Ok(storage)
}

/// [`build_storage`] wrapped in the process-wide access lock.
pub async fn build_serialized(cfg: &StorageConfig) -> anyhow::Result<SerializedStorage> {
    Ok(SerializedStorage::from_boxed(build_storage(cfg).await?))
}
