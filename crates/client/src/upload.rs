//! Upload orchestration: session + form metadata → multipart submission.

use log::{debug, info};
use reqwest::blocking::multipart;
use thiserror::Error;

use datashelf_engine::EditSession;
use datashelf_io::{csv, ExportError, PROCESSED_CONTENT_TYPE, PROCESSED_FILE_NAME};

use crate::auth::Credentials;
use crate::client::{ClientError, DatasetClient};
use crate::metadata::Metadata;

#[derive(Debug, Error)]
pub enum UploadError {
    /// Nothing loaded in the session
    #[error("no file loaded, choose a CSV or Excel file first")]
    FileRequired,
    #[error(transparent)]
    Serialize(#[from] ExportError),
    #[error(transparent)]
    Transport(#[from] ClientError),
}

/// Everything one upload submits: the serialized processed grid plus the
/// text fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadForm {
    pub file_name: String,
    pub content_type: String,
    pub csv: String,
    pub name: String,
    pub tags: String,
    pub source: String,
    pub description: String,
    pub license: String,
    pub visibility: String,
}

impl UploadForm {
    /// Text fields in submission order (the file part goes first).
    pub fn fields(&self) -> [(&'static str, &str); 6] {
        [
            ("name", &self.name),
            ("tags", &self.tags),
            ("source", &self.source),
            ("description", &self.description),
            ("license", &self.license),
            ("visibility", &self.visibility),
        ]
    }
}

/// Where uploads go. The HTTP client is the real one; tests record instead.
pub trait DatasetTransport {
    fn upload(&self, form: &UploadForm, credentials: Option<&Credentials>) -> Result<(), ClientError>;
}

impl DatasetTransport for DatasetClient {
    fn upload(&self, form: &UploadForm, credentials: Option<&Credentials>) -> Result<(), ClientError> {
        let part = multipart::Part::text(form.csv.clone())
            .file_name(form.file_name.clone())
            .mime_str(&form.content_type)
            .map_err(|e| ClientError::Parse(e.to_string()))?;

        let mut body = multipart::Form::new().part("file", part);
        for (key, value) in form.fields() {
            body = body.text(key, value.to_string());
        }

        self.send(self.http.post(self.url("/upload")).multipart(body), credentials)?;
        Ok(())
    }
}

/// Build the form for the session's processed rows, or `FileRequired`.
pub fn build_form(session: &EditSession, metadata: &Metadata) -> Result<UploadForm, UploadError> {
    if !session.is_loaded() {
        return Err(UploadError::FileRequired);
    }

    let processed = session.processed();
    debug!("Serializing {} processed rows", processed.len());

    Ok(UploadForm {
        file_name: PROCESSED_FILE_NAME.to_string(),
        content_type: PROCESSED_CONTENT_TYPE.to_string(),
        csv: csv::to_csv(processed)?,
        name: metadata.name.clone(),
        tags: metadata.tags.clone(),
        source: metadata.source.clone(),
        description: metadata.description.clone(),
        license: metadata.effective_license().to_string(),
        visibility: metadata.visibility.to_string(),
    })
}

/// Submit the session's processed grid with `metadata`.
///
/// The session is only borrowed: on failure the grid, window and form are
/// still there for another attempt. No retries.
pub fn submit(
    transport: &dyn DatasetTransport,
    session: &EditSession,
    metadata: &Metadata,
    credentials: Option<&Credentials>,
) -> Result<(), UploadError> {
    let form = build_form(session, metadata)?;
    transport.upload(&form, credentials)?;
    info!("Uploaded dataset '{}'", form.name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::time::Duration;

    use datashelf_engine::{Grid, Workbook};
    use httpmock::prelude::*;

    use crate::metadata::Visibility;

    #[derive(Default)]
    struct RecordingTransport {
        calls: RefCell<Vec<UploadForm>>,
        fail_with: Option<u16>,
    }

    impl DatasetTransport for RecordingTransport {
        fn upload(&self, form: &UploadForm, _credentials: Option<&Credentials>) -> Result<(), ClientError> {
            self.calls.borrow_mut().push(form.clone());
            match self.fail_with {
                Some(status) => Err(ClientError::Http(status, "upload rejected".into())),
                None => Ok(()),
            }
        }
    }

    fn session_with(rows: &[&[&str]]) -> EditSession {
        let rows = rows
            .iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect();
        EditSession::with_workbook(Workbook::from_csv(Grid::from_rows(rows)))
    }

    fn metadata() -> Metadata {
        Metadata {
            name: "Solar Power".into(),
            tags: "energy, solar".into(),
            source: "PLN".into(),
            description: "Hourly output".into(),
            ..Metadata::default()
        }
    }

    #[test]
    fn test_no_file_fails_before_transport() {
        let transport = RecordingTransport::default();
        let err = submit(&transport, &EditSession::new(), &metadata(), None).unwrap_err();
        assert!(matches!(err, UploadError::FileRequired));
        assert!(transport.calls.borrow().is_empty());
    }

    #[test]
    fn test_form_carries_processed_rows() {
        let mut session = session_with(&[&["title"], &["h1", "h2"], &["1", "a,b"], &["total", ""]]);
        session.set_skip_rows(1);
        session.set_skip_footer(1);

        let transport = RecordingTransport::default();
        submit(&transport, &session, &metadata(), None).unwrap();

        let calls = transport.calls.borrow();
        assert_eq!(calls.len(), 1);
        let form = &calls[0];
        assert_eq!(form.file_name, "processed_dataset.csv");
        assert_eq!(form.content_type, "text/csv");
        assert_eq!(form.csv, "h1,h2\n1,\"a,b\"");
        assert_eq!(form.license, "cc-by");
        assert_eq!(form.visibility, "public");
    }

    #[test]
    fn test_form_keeps_blank_single_column_rows() {
        let form = build_form(&session_with(&[&["h"], &[""], &["x"]]), &metadata()).unwrap();
        assert_eq!(form.csv, "h\n\"\"\nx");
    }

    #[test]
    fn test_field_set_is_fixed() {
        let form = build_form(&session_with(&[&["a"]]), &metadata()).unwrap();
        let keys: Vec<&str> = form.fields().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["name", "tags", "source", "description", "license", "visibility"]);
    }

    #[test]
    fn test_blank_license_defaults() {
        let meta = Metadata {
            license: String::new(),
            visibility: Visibility::Private,
            ..metadata()
        };
        let form = build_form(&session_with(&[&["a"]]), &meta).unwrap();
        assert_eq!(form.license, "cc-by");
        assert_eq!(form.visibility, "private");
    }

    #[test]
    fn test_transport_failure_leaves_session_intact() {
        let mut session = session_with(&[&["h"], &["1"], &["2"]]);
        session.set_cell(1, 0, "edited").unwrap();
        session.set_skip_rows(1);
        let before = session.processed().to_vec();

        let transport = RecordingTransport { fail_with: Some(500), ..Default::default() };
        let err = submit(&transport, &session, &metadata(), None).unwrap_err();
        assert!(matches!(err, UploadError::Transport(ClientError::Http(500, _))));

        assert_eq!(session.processed(), before.as_slice());
        assert_eq!(session.window().skip_rows, 1);
    }

    #[test]
    fn test_http_upload_posts_multipart() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/upload")
                .header("Authorization", "Basic dXNlcjpwYXNz");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(serde_json::json!({"message": "ok"}));
        });

        let client = DatasetClient::new(&server.base_url(), Duration::from_secs(5)).unwrap();
        let creds = Credentials::new("user", "pass");
        submit(&client, &session_with(&[&["a", "b"], &["1", "2"]]), &metadata(), Some(&creds)).unwrap();
        mock.assert();
    }

    #[test]
    fn test_http_upload_unauthorized() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/upload");
            then.status(401);
        });

        let client = DatasetClient::new(&server.base_url(), Duration::from_secs(5)).unwrap();
        let err = submit(&client, &session_with(&[&["a"]]), &metadata(), None).unwrap_err();
        assert!(matches!(err, UploadError::Transport(ClientError::Unauthorized(401))));
    }
}
