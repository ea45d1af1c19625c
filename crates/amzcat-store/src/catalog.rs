//! JSON-file catalog of curated product records.

use std::path::{Path, PathBuf};

use amzcat_core::ProductRecord;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::StoreError;

/// On-disk layout of the catalog file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogState {
    next_id: i64,
    products: Vec<ProductRecord>,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self {
            next_id: 1,
            products: Vec::new(),
        }
    }
}

/// A product catalog persisted as a single JSON file.
///
/// Every mutation rewrites the whole file through a temporary sibling and a
/// rename, so a crash mid-write leaves the previous catalog intact. Ids are
/// never reused, even after [`CatalogStore::delete`] or [`CatalogStore::clear`].
#[derive(Debug)]
pub struct CatalogStore {
    path: PathBuf,
    state: CatalogState,
}

impl CatalogStore {
    /// Opens the catalog at `path`. A missing file is an empty catalog.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file exists but cannot be read, or
    /// [`StoreError::Corrupt`] if it does not hold a catalog.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let state = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
                    path: path.clone(),
                    source,
                })?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => CatalogState::default(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        tracing::debug!(path = %path.display(), products = state.products.len(), "catalog opened");
        Ok(Self { path, state })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.state.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.products.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: i64) -> Option<&ProductRecord> {
        self.state.products.iter().find(|p| p.id == Some(id))
    }

    /// All products, newest first.
    #[must_use]
    pub fn list(&self) -> Vec<ProductRecord> {
        let mut products = self.state.products.clone();
        products.sort_by(|a, b| b.id.cmp(&a.id));
        products
    }

    /// Adds `record` under a fresh id and returns the stored copy.
    ///
    /// `extracted_at` is kept when the caller set it, else stamped with the
    /// current time; `updated_at` is always stamped.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingTitle`] for a blank title, or any error
    /// from writing the catalog file.
    pub async fn add(&mut self, mut record: ProductRecord) -> Result<ProductRecord, StoreError> {
        require_title(&record)?;

        let now = Utc::now();
        let mut next = self.state.clone();
        record.id = Some(next.next_id);
        record.extracted_at.get_or_insert(now);
        record.updated_at = Some(now);
        next.next_id += 1;
        next.products.push(record.clone());

        self.commit(next).await?;
        tracing::info!(id = record.id, product = record.display_key(), "product added");
        Ok(record)
    }

    /// Replaces the stored product `id` with `record`, keeping its id and
    /// original `extracted_at`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when `id` is unknown,
    /// [`StoreError::MissingTitle`] for a blank title, or any error from
    /// writing the catalog file.
    pub async fn update(
        &mut self,
        id: i64,
        mut record: ProductRecord,
    ) -> Result<ProductRecord, StoreError> {
        require_title(&record)?;

        let mut next = self.state.clone();
        let slot = next
            .products
            .iter_mut()
            .find(|p| p.id == Some(id))
            .ok_or(StoreError::NotFound { id })?;
        record.id = Some(id);
        record.extracted_at = slot.extracted_at;
        record.updated_at = Some(Utc::now());
        *slot = record.clone();

        self.commit(next).await?;
        tracing::info!(id, "product updated");
        Ok(record)
    }

    /// Removes product `id` and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when `id` is unknown, or any error
    /// from writing the catalog file.
    pub async fn delete(&mut self, id: i64) -> Result<ProductRecord, StoreError> {
        let mut next = self.state.clone();
        let idx = next
            .products
            .iter()
            .position(|p| p.id == Some(id))
            .ok_or(StoreError::NotFound { id })?;
        let removed = next.products.remove(idx);

        self.commit(next).await?;
        tracing::info!(id, "product deleted");
        Ok(removed)
    }

    /// Flags the images of product `id` whose URL is in `urls` as downloaded.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when `id` is unknown, or any error
    /// from writing the catalog file.
    pub async fn mark_images_downloaded(
        &mut self,
        id: i64,
        urls: &[String],
    ) -> Result<ProductRecord, StoreError> {
        let mut next = self.state.clone();
        let product = next
            .products
            .iter_mut()
            .find(|p| p.id == Some(id))
            .ok_or(StoreError::NotFound { id })?;
        for image in &mut product.images {
            if urls.contains(&image.url) {
                image.downloaded = true;
            }
        }
        product.updated_at = Some(Utc::now());
        let updated = product.clone();

        self.commit(next).await?;
        Ok(updated)
    }

    /// Removes every product. Returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns any error from writing the catalog file.
    pub async fn clear(&mut self) -> Result<usize, StoreError> {
        let mut next = self.state.clone();
        let removed = next.products.len();
        next.products.clear();

        self.commit(next).await?;
        tracing::info!(removed, "catalog cleared");
        Ok(removed)
    }

    /// Writes `next` to disk and adopts it as the in-memory state.
    async fn commit(&mut self, next: CatalogState) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(&next)?;
        write_atomic(&self.path, &bytes).await?;
        self.state = next;
        Ok(())
    }
}

fn require_title(record: &ProductRecord) -> Result<(), StoreError> {
    if record.title.trim().is_empty() {
        return Err(StoreError::MissingTitle);
    }
    Ok(())
}

async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, bytes).await.map_err(io_err)?;
    tokio::fs::rename(&tmp, path).await.map_err(io_err)?;
    Ok(())
}
