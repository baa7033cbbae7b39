//! Dataset catalog API client.
//!
//! Covers the catalog's REST contract (login, list, sample, metadata,
//! delete, download) and the upload flow: turning an editing session plus
//! form metadata into a multipart submission.
//!
//! Blocking only. No retries.

mod auth;
mod client;
mod metadata;
mod upload;

pub use auth::{auth_file_path, delete_auth, load_auth, load_auth_from, save_auth, save_auth_to, Credentials};
pub use client::{collection_name, ClientError, DatasetClient};
pub use metadata::{
    DatasetMetadata, DatasetSummary, Metadata, MetadataUpdate, Visibility, DEFAULT_LICENSE,
};
pub use upload::{build_form, submit, DatasetTransport, UploadError, UploadForm};
