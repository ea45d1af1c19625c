//! Sequential download of a record's gallery images.

use std::path::{Path, PathBuf};

use amzcat_core::ProductRecord;
use serde::Serialize;

use super::url::image_extension;
use super::ProductPageClient;
use crate::error::ScraperError;

/// One image to fetch and the file name it should be stored under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRequest {
    pub url: String,
    /// 1-based position in the record's image list.
    pub ordinal: usize,
    pub file_name: String,
}

/// Result of a single image download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageDownloadOutcome {
    pub url: String,
    pub file_name: String,
    /// Where the bytes were written, when the download succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ImageDownloadOutcome {
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Lists the download requests for every image in `record`, in order.
///
/// Files are named `{stem}_{ordinal}.{ext}`, where the stem is the ASIN,
/// else `product_{id}`, else `product`.
#[must_use]
pub fn image_requests(record: &ProductRecord) -> Vec<ImageRequest> {
    let stem = file_stem(record);
    record
        .images
        .iter()
        .enumerate()
        .map(|(idx, image)| {
            let ordinal = idx + 1;
            ImageRequest {
                url: image.url.clone(),
                ordinal,
                file_name: format!("{stem}_{ordinal}.{}", image_extension(&image.url)),
            }
        })
        .collect()
}

fn file_stem(record: &ProductRecord) -> String {
    if !record.asin.is_empty() {
        return record.asin.clone();
    }
    match record.id {
        Some(id) => format!("product_{id}"),
        None => "product".to_owned(),
    }
}

impl ProductPageClient {
    /// Downloads every image of `record` into `dir`, one at a time.
    ///
    /// A failed image is recorded in its outcome and does not stop the
    /// remaining downloads. Each successful image has its `downloaded` flag
    /// set on `record`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Io`] only when `dir` cannot be created.
    pub async fn download_images(
        &self,
        record: &mut ProductRecord,
        dir: &Path,
    ) -> Result<Vec<ImageDownloadOutcome>, ScraperError> {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|source| ScraperError::Io {
                path: dir.to_path_buf(),
                source,
            })?;

        let requests = image_requests(record);
        let mut outcomes = Vec::with_capacity(requests.len());

        for request in requests {
            let path = dir.join(&request.file_name);
            match self.download_one(&request.url, &path).await {
                Ok(bytes) => {
                    tracing::debug!(url = %request.url, path = %path.display(), bytes, "image saved");
                    if let Some(image) = record.images.get_mut(request.ordinal - 1) {
                        image.downloaded = true;
                    }
                    outcomes.push(ImageDownloadOutcome {
                        url: request.url,
                        file_name: request.file_name,
                        path: Some(path),
                        error: None,
                    });
                }
                Err(e) => {
                    tracing::warn!(url = %request.url, error = %e, "image download failed");
                    outcomes.push(ImageDownloadOutcome {
                        url: request.url,
                        file_name: request.file_name,
                        path: None,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        let saved = outcomes.iter().filter(|o| o.succeeded()).count();
        tracing::info!(
            product = record.display_key(),
            saved,
            failed = outcomes.len() - saved,
            "image download finished"
        );
        Ok(outcomes)
    }

    async fn download_one(&self, url: &str, path: &Path) -> Result<usize, ScraperError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ScraperError::NotFound {
                url: url.to_owned(),
            });
        }
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let bytes = response.bytes().await?;
        tokio::fs::write(path, &bytes)
            .await
            .map_err(|source| ScraperError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(bytes.len())
    }
}
