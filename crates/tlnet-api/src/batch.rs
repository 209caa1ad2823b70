// Batch configuration transfer
//
// `/delta/adm_batch` exports and imports the card's whole configuration as
// a flat text document, per scope. Downloads feed the session caches;
// uploads are the bulk write path and invalidate the uploaded scope.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::UserDirs;
use reqwest::multipart::{Form, Part};
use tracing::{debug, warn};

use crate::cache::ConfigInvalidator;
use crate::document::Scope;
use crate::error::Error;
use crate::session::Session;
use crate::transport::check_status;

pub const BATCH_ENDPOINT: &str = "/delta/adm_batch";

/// How long the card stays unreachable while applying an uploaded document.
pub const APPLY_DOWNTIME: Duration = Duration::from_secs(10);

/// Where an uploaded document comes from.
#[derive(Debug, Clone)]
pub enum UploadSource {
    File(PathBuf),
    Bytes { file_name: String, data: Vec<u8> },
}

impl From<PathBuf> for UploadSource {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

impl From<&Path> for UploadSource {
    fn from(path: &Path) -> Self {
        Self::File(path.to_path_buf())
    }
}

/// Result of an accepted upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadReceipt {
    pub scope: Scope,
    pub bytes: usize,
    /// Requests issued within this window after the upload may fail.
    pub offline_for: Duration,
}

/// Batch configuration endpoint bound to a session.
///
/// Holds no state of its own; every call is one request on the session's
/// transport.
pub struct BatchConfig<'a> {
    session: &'a Session,
    invalidator: &'a dyn ConfigInvalidator,
}

impl<'a> BatchConfig<'a> {
    /// Bind to `session`, which also receives invalidations.
    pub fn new(session: &'a Session) -> Self {
        Self {
            session,
            invalidator: session,
        }
    }

    /// Bind to `session` but report invalidations to `invalidator`.
    pub fn with_invalidator(session: &'a Session, invalidator: &'a dyn ConfigInvalidator) -> Self {
        Self {
            session,
            invalidator,
        }
    }

    /// Download the raw configuration document for `scope`.
    pub async fn download(&self, scope: Scope) -> Result<String, Error> {
        let http = self.session.http()?;
        let url = self.session.url(BATCH_ENDPOINT)?;
        debug!(%scope, url = %url, "downloading batch configuration");

        let resp = http
            .post(url)
            .form(&[(scope.download_field(), "Download")])
            .send()
            .await?;
        Ok(check_status(resp)?.text().await?)
    }

    /// Download `scope` and write it to `path`, or to the user's downloads
    /// folder when `path` is `None`. Returns the path written.
    pub async fn download_to_file(
        &self,
        scope: Scope,
        path: Option<&Path>,
    ) -> Result<PathBuf, Error> {
        let path = path.map_or_else(|| default_download_path(scope), Path::to_path_buf);
        let document = self.download(scope).await?;
        tokio::fs::write(&path, document.as_bytes())
            .await
            .map_err(|source| Error::Io {
                path: path.clone(),
                source,
            })?;
        debug!(%scope, path = %path.display(), "batch configuration saved");
        Ok(path)
    }

    /// Upload a configuration document for `scope`.
    ///
    /// A missing source file is reported before any request is made. On
    /// success the scope's cache is invalidated and the card restarts its
    /// services for about [`APPLY_DOWNTIME`].
    pub async fn upload(
        &self,
        scope: Scope,
        source: impl Into<UploadSource>,
    ) -> Result<UploadReceipt, Error> {
        let (file_name, data) = match source.into() {
            UploadSource::File(path) => read_document(scope, &path).await?,
            UploadSource::Bytes { file_name, data } => (file_name, data),
        };
        let bytes = data.len();

        let http = self.session.http()?;
        let url = self.session.url(BATCH_ENDPOINT)?;
        debug!(%scope, url = %url, bytes, "uploading batch configuration");

        let part = Part::bytes(data)
            .file_name(file_name)
            .mime_str("multipart/form-data")?;
        let form = Form::new()
            .text(scope.upload_button(), "Upload")
            .part(scope.upload_field(), part);

        check_status(http.post(url).multipart(form).send().await?)?;
        self.invalidator.invalidate(scope);

        let base = self
            .session
            .base_url()
            .map(|u| u.to_string())
            .unwrap_or_default();
        warn!(
            %scope,
            card = %base,
            "configuration uploaded; card will be offline for approximately {}s",
            APPLY_DOWNTIME.as_secs()
        );

        Ok(UploadReceipt {
            scope,
            bytes,
            offline_for: APPLY_DOWNTIME,
        })
    }
}

async fn read_document(scope: Scope, path: &Path) -> Result<(String, Vec<u8>), Error> {
    let is_file = tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false);
    if !is_file {
        warn!(%scope, path = %path.display(), "configuration file does not exist");
        return Err(Error::ResourceNotFound {
            scope,
            path: path.to_path_buf(),
        });
    }

    let data = tokio::fs::read(path).await.map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file_name = path.file_name().map_or_else(
        || scope.default_file_name().to_owned(),
        |name| name.to_string_lossy().into_owned(),
    );
    Ok((file_name, data))
}

/// `<downloads folder>/<scope>_config.ini`.
///
/// Falls back to `$HOME/Downloads` when the platform reports no downloads
/// folder.
pub fn default_download_path(scope: Scope) -> PathBuf {
    let dir = UserDirs::new().map_or_else(
        || PathBuf::from("."),
        |dirs| {
            dirs.download_dir()
                .map_or_else(|| dirs.home_dir().join("Downloads"), Path::to_path_buf)
        },
    );
    dir.join(scope.default_file_name())
}
