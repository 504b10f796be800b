//! Local filesystem storage implementation.
//!
//! Keeps the whole catalog in a single `products.json` under the storage
//! root, rewritten atomically on every save.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::ScrapedProduct;
use crate::storage::{Catalog, ProductStorage, WriteMetadata};

const CATALOG_KEY: &str = "products.json";

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_bytes(key, &bytes).await
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_bytes(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Load the stored catalog, if any.
    pub async fn load_catalog(&self) -> Result<Option<Catalog>> {
        self.read_json(CATALOG_KEY).await
    }
}

#[async_trait]
impl ProductStorage for LocalStorage {
    async fn save_products(&self, products: &[ScrapedProduct]) -> Result<WriteMetadata> {
        let mut merged = self.load_products().await?;
        let mut positions: HashMap<String, usize> = merged
            .iter()
            .enumerate()
            .map(|(idx, product)| (product.fingerprint(), idx))
            .collect();

        let (mut added, mut updated) = (0, 0);
        for product in products {
            let fingerprint = product.fingerprint();
            match positions.get(&fingerprint) {
                Some(&idx) => {
                    merged[idx] = product.clone();
                    updated += 1;
                }
                None => {
                    positions.insert(fingerprint, merged.len());
                    merged.push(product.clone());
                    added += 1;
                }
            }
        }

        let catalog = Catalog::new(merged);
        self.write_json(CATALOG_KEY, &catalog).await?;
        log::info!(
            "Catalog: {} products ({} added, {} updated) written to {}",
            catalog.count,
            added,
            updated,
            self.path(CATALOG_KEY).display()
        );

        Ok(WriteMetadata {
            count: catalog.count,
            added,
            updated,
            timestamp: catalog.updated_at,
        })
    }

    async fn load_products(&self) -> Result<Vec<ScrapedProduct>> {
        Ok(self
            .load_catalog()
            .await?
            .map(|catalog| catalog.products)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn product(url: &str, name: &str) -> ScrapedProduct {
        ScrapedProduct {
            name: Some(name.to_string()),
            price: Some(199.0),
            dimensions: None,
            images: Vec::new(),
            main_image: None,
            color: None,
            color_options: None,
            material: None,
            category: None,
            url: url.to_string(),
        }
    }

    #[tokio::test]
    async fn test_write_and_read() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        storage.write_bytes("test.txt", b"hello").await.unwrap();
        let data = storage.read_bytes("test.txt").await.unwrap();
        assert_eq!(data, Some(b"hello".to_vec()));
        assert!(!storage.path("test.tmp").exists());
    }

    #[tokio::test]
    async fn test_load_empty() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path().join("nested"));

        assert!(storage.load_catalog().await.unwrap().is_none());
        assert!(storage.load_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_merges_by_fingerprint() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        let first = storage
            .save_products(&[
                product("https://shop.example.com/product/a", "A"),
                product("https://shop.example.com/product/b", "B"),
            ])
            .await
            .unwrap();
        assert_eq!((first.count, first.added, first.updated), (2, 2, 0));

        let second = storage
            .save_products(&[
                product("https://shop.example.com/product/b/?utm=x", "B v2"),
                product("https://shop.example.com/product/c", "C"),
            ])
            .await
            .unwrap();
        assert_eq!((second.count, second.added, second.updated), (3, 1, 1));

        let names: Vec<_> = storage
            .load_products()
            .await
            .unwrap()
            .into_iter()
            .filter_map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["A", "B v2", "C"]);

        let catalog = storage.load_catalog().await.unwrap().unwrap();
        assert_eq!(catalog.count, 3);
    }
}
