use crate::core::{RedirectRecord, RedirectStore};
use crate::error::HandlerError;
use async_trait::async_trait;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::put_object::PutObjectError;
use aws_sdk_s3::Client;

/// Stores redirects as empty objects in a bucket served through S3 static
/// website hosting, which answers reads of the key with a 301 to the
/// `WebsiteRedirectLocation`.
#[derive(Debug)]
pub struct S3RedirectStore {
    bucket: String,
    s3_client: Client,
}

impl S3RedirectStore {
    pub fn new(bucket: String, s3_client: Client) -> Self {
        Self { bucket, s3_client }
    }
}

#[async_trait]
impl RedirectStore for S3RedirectStore {
    async fn put_redirect(&self, record: RedirectRecord) -> Result<(), HandlerError> {
        tracing::debug!(
            "Storing redirect {} => {} in {}",
            record.slug,
            record.long_url,
            self.bucket
        );

        self.s3_client
            .put_object()
            .bucket(&self.bucket)
            .key(record.slug)
            .website_redirect_location(record.long_url)
            .send()
            .await
            .map(|_| ())
            .map_err(into_handler_error)
    }
}

// Errors that came back with an HTTP response keep its status; anything that
// never reached S3 is a plain storage failure.
fn into_handler_error(e: SdkError<PutObjectError>) -> HandlerError {
    let message = e
        .as_service_error()
        .and_then(|service_error| service_error.message())
        .map(str::to_string)
        .unwrap_or_else(|| DisplayErrorContext(&e).to_string());

    match e.raw_response().map(|response| response.status().as_u16()) {
        Some(status_code) => HandlerError::Http {
            status_code,
            message,
        },
        None => HandlerError::StorageWrite { message },
    }
}
