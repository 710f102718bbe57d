use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::mpsc::Sender;

use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart};
use aws_sdk_s3::Client;

use super::types::{TransferEvent, UploadError};

/// S3 minimum part size; also the threshold below which a plain
/// `PutObject` is used instead of a multipart upload.
pub const PART_SIZE: u64 = 5 * 1024 * 1024;

/// Moves a local file into the bucket, reporting progress on a channel.
///
/// Runs on the upload worker thread; the UI never blocks on it.
#[derive(Clone)]
pub struct BucketTransfer {
    client: Client,
    bucket: String,
}

impl BucketTransfer {
    pub fn new(client: Client, bucket: String) -> Self {
        Self { client, bucket }
    }

    pub async fn upload(
        &self,
        path: &Path,
        key: &str,
        events: &Sender<TransferEvent>,
    ) -> Result<(), UploadError> {
        let total = std::fs::metadata(path)
            .map_err(|source| UploadError::Read {
                path: path.to_path_buf(),
                source,
            })?
            .len();

        if total <= PART_SIZE {
            self.put_single(path, key, total, events).await
        } else {
            self.put_multipart(path, key, total, events).await
        }
    }

    async fn put_single(
        &self,
        path: &Path,
        key: &str,
        total: u64,
        events: &Sender<TransferEvent>,
    ) -> Result<(), UploadError> {
        let body = std::fs::read(path).map_err(|source| UploadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(sdk_error)?;

        let _ = events.send(TransferEvent::Progress { loaded: total, total });
        Ok(())
    }

    async fn put_multipart(
        &self,
        path: &Path,
        key: &str,
        total: u64,
        events: &Sender<TransferEvent>,
    ) -> Result<(), UploadError> {
        let created = self
            .client
            .create_multipart_upload()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(sdk_error)?;
        let upload_id = created
            .upload_id()
            .ok_or(UploadError::MissingUploadId)?
            .to_string();

        match self
            .upload_parts(path, key, &upload_id, total, events)
            .await
        {
            Ok(parts) => {
                let completed = CompletedMultipartUpload::builder()
                    .set_parts(Some(parts))
                    .build();
                self.client
                    .complete_multipart_upload()
                    .bucket(&self.bucket)
                    .key(key)
                    .upload_id(&upload_id)
                    .multipart_upload(completed)
                    .send()
                    .await
                    .map_err(sdk_error)?;
                Ok(())
            }
            Err(err) => {
                // Discard the parts uploaded so far; the original error is
                // what gets reported either way.
                if let Err(abort_err) = self
                    .client
                    .abort_multipart_upload()
                    .bucket(&self.bucket)
                    .key(key)
                    .upload_id(&upload_id)
                    .send()
                    .await
                {
                    tracing::warn!(
                        error = %DisplayErrorContext(abort_err),
                        key,
                        "failed to abort multipart upload"
                    );
                }
                Err(err)
            }
        }
    }

    async fn upload_parts(
        &self,
        path: &Path,
        key: &str,
        upload_id: &str,
        total: u64,
        events: &Sender<TransferEvent>,
    ) -> Result<Vec<CompletedPart>, UploadError> {
        let mut file = File::open(path).map_err(|source| UploadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut parts = Vec::with_capacity(part_count(total) as usize);
        let mut loaded: u64 = 0;
        let mut part_number: i32 = 1;

        loop {
            let chunk = read_chunk(&mut file, PART_SIZE).map_err(|source| UploadError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            if chunk.is_empty() {
                break;
            }
            let chunk_len = chunk.len() as u64;

            let uploaded = self
                .client
                .upload_part()
                .bucket(&self.bucket)
                .key(key)
                .upload_id(upload_id)
                .part_number(part_number)
                .body(ByteStream::from(chunk))
                .send()
                .await
                .map_err(sdk_error)?;
            let etag = uploaded
                .e_tag()
                .ok_or(UploadError::MissingETag(part_number))?
                .to_string();

            parts.push(
                CompletedPart::builder()
                    .e_tag(etag)
                    .part_number(part_number)
                    .build(),
            );
            loaded += chunk_len;
            let _ = events.send(TransferEvent::Progress { loaded, total });
            part_number += 1;
        }

        Ok(parts)
    }
}

fn sdk_error(err: impl std::error::Error) -> UploadError {
    UploadError::Storage(DisplayErrorContext(err).to_string())
}

fn read_chunk(reader: impl Read, limit: u64) -> std::io::Result<Vec<u8>> {
    let mut chunk = Vec::new();
    reader.take(limit).read_to_end(&mut chunk)?;
    Ok(chunk)
}

pub(crate) fn part_count(total: u64) -> u64 {
    if total == 0 {
        1
    } else {
        total.div_ceil(PART_SIZE)
    }
}
