use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::client::ApiClient;
use crate::config::FileManagerConfig;
use crate::path;
use crate::perms::Permissions;
use crate::protocol::{self, ActionRequest, Interpreted, ListingRecord};
use crate::transport::TransportError;

/// Whether an entry is a plain file or a directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    #[default]
    File,
    Dir,
}

/// One snapshot of an entry's metadata.
///
/// An entity owns two of these. Cloning is a deep copy (all fields are
/// owned), so the pair never shares backing storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub name: String,
    /// Segments of the containing directory, without separators.
    pub path: Vec<String>,
    pub kind: EntryKind,
    /// Size in bytes.
    pub size: u64,
    pub modified: Option<NaiveDateTime>,
    pub perms: Permissions,
    /// File content; empty until fetched with `get_content`.
    pub content: String,
    /// Apply a permission change to the whole subtree.
    pub recursive: bool,
    /// Server-supplied public path, when the deployment exposes one.
    pub web_path: String,
}

impl Snapshot {
    /// Canonical absolute path of this entry.
    pub fn full_path(&self) -> String {
        path::full_path(&self.path, &self.name)
    }

    /// Size in whole kilobytes, rounded.
    pub fn size_kb(&self) -> u64 {
        (self.size as f64 / 1024.0).round() as u64
    }
}

/// How an action ended when it did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The server accepted the action; carries the raw response body.
    Done(Value),
    /// Blank-name guard: no request was sent and nothing changed.
    Skipped,
}

/// A failed action. The surfaced message is also recorded on the entity.
#[derive(Debug, Error)]
pub enum ActionError {
    /// The server reported a structured error inside a successful response.
    #[error("{0}")]
    Domain(String),
    /// The request itself failed. `message` is the structured `result.error`
    /// from the failure body when present, the localized per-action default
    /// otherwise.
    #[error("{message}")]
    Transport {
        message: String,
        #[source]
        source: TransportError,
    },
}

/// Client-side representation of one remote file-system entry.
///
/// Holds the last server-confirmed state (`committed`) next to the state a
/// UI is editing (`draft`). Every remote action follows the same protocol:
/// mark busy and clear the error, post a `mode`-tagged request, normalize
/// the response, commit the draft on success or record the failure message,
/// and drop the busy flag on the way out. Actions take `&mut self`, so two
/// actions can never be in flight on the same entity; `busy` remains
/// observable so a UI can disable controls while one is.
#[derive(Debug)]
pub struct Entity {
    committed: Snapshot,
    /// The snapshot the UI edits freely.
    pub draft: Snapshot,
    error: String,
    busy: bool,
}

impl Entity {
    /// Build an entity from a server listing record plus the directory the
    /// listing was taken in.
    pub fn from_listing(record: &ListingRecord, dir: Vec<String>) -> Self {
        Self::from_snapshot(Snapshot {
            name: record.name.clone(),
            path: dir,
            kind: record.kind,
            size: record.size,
            modified: path::parse_timestamp(&record.date),
            perms: Permissions::from_rights(&record.rights),
            content: record.content.clone(),
            recursive: false,
            web_path: record.web_path.clone(),
        })
    }

    /// Bare placeholder (a "new folder" row, say); only the name and the
    /// containing directory are meaningful.
    pub fn new_draft(name: impl Into<String>, dir: Vec<String>) -> Self {
        Self::from_snapshot(Snapshot {
            name: name.into(),
            path: dir,
            kind: EntryKind::default(),
            size: 0,
            modified: None,
            perms: Permissions::default(),
            content: String::new(),
            recursive: false,
            web_path: String::new(),
        })
    }

    fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            committed: snapshot.clone(),
            draft: snapshot,
            error: String::new(),
            busy: false,
        }
    }

    /// State last confirmed by (or accepted as reflecting) the server.
    pub fn committed(&self) -> &Snapshot {
        &self.committed
    }

    /// Message of the last failed action; empty when none.
    pub fn error(&self) -> &str {
        &self.error
    }

    /// True while a request/response cycle is in flight.
    pub fn busy(&self) -> bool {
        self.busy
    }

    /// Accept the draft as the server-confirmed state.
    pub fn commit(&mut self) {
        self.committed = self.draft.clone();
    }

    /// Discard unsaved edits, restoring the draft from the committed state.
    pub fn revert(&mut self) {
        self.draft = self.committed.clone();
        self.error.clear();
    }

    async fn execute(
        &mut self,
        api: &ApiClient,
        url: &str,
        request: ActionRequest,
        fallback_key: &str,
    ) -> Result<Outcome, ActionError> {
        self.busy = true;
        self.error.clear();

        let outcome = match api.post(url, &request).await {
            Ok(body) => match protocol::interpret(body) {
                Interpreted::Success(body) => {
                    if let ActionRequest::EditFile { .. } = request {
                        // Fetched content lands in both snapshots ahead of
                        // the commit.
                        if let Some(text) = body.get("result").and_then(Value::as_str) {
                            self.draft.content = text.to_string();
                            self.committed.content = text.to_string();
                        }
                    }
                    self.commit();
                    Ok(Outcome::Done(body))
                }
                Interpreted::Failure(message) => {
                    warn!("action rejected: {}", message);
                    self.error = message.clone();
                    Err(ActionError::Domain(message))
                }
            },
            Err(source) => {
                let message = source
                    .domain_error()
                    .unwrap_or_else(|| api.instant(fallback_key));
                warn!("request failed: {}", message);
                self.error = message.clone();
                Err(ActionError::Transport { message, source })
            }
        };

        self.busy = false;
        outcome
    }

    fn draft_name_blank(&self) -> bool {
        self.draft.name.trim().is_empty()
    }

    /// Create the directory named by the draft. Skipped silently when the
    /// draft name is blank.
    pub async fn create_folder(&mut self, api: &ApiClient) -> Result<Outcome, ActionError> {
        if self.draft_name_blank() {
            return Ok(Outcome::Skipped);
        }
        info!("create folder: {}", self.draft.full_path());
        let request = ActionRequest::AddFolder {
            path: self.draft.path.join("/"),
            name: self.draft.name.clone(),
        };
        self.execute(api, &api.config().create_folder_url, request, "error_creating_folder")
            .await
    }

    /// Move the entry from its committed path to the draft path. Skipped
    /// when the draft name is blank.
    pub async fn rename(&mut self, api: &ApiClient) -> Result<Outcome, ActionError> {
        if self.draft_name_blank() {
            return Ok(Outcome::Skipped);
        }
        info!(
            "rename: {} -> {}",
            self.committed.full_path(),
            self.draft.full_path()
        );
        let request = ActionRequest::Rename {
            path: self.committed.full_path(),
            new_path: self.draft.full_path(),
        };
        self.execute(api, &api.config().rename_url, request, "error_renaming")
            .await
    }

    /// Copy the committed entry to the draft path. Skipped when the draft
    /// name is blank.
    pub async fn copy(&mut self, api: &ApiClient) -> Result<Outcome, ActionError> {
        if self.draft_name_blank() {
            return Ok(Outcome::Skipped);
        }
        info!(
            "copy: {} -> {}",
            self.committed.full_path(),
            self.draft.full_path()
        );
        let request = ActionRequest::Copy {
            path: self.committed.full_path(),
            new_path: self.draft.full_path(),
        };
        self.execute(api, &api.config().copy_url, request, "error_copying")
            .await
    }

    /// Compress the committed entry into the archive named by the draft.
    /// Skipped when the draft name is blank.
    pub async fn compress(&mut self, api: &ApiClient) -> Result<Outcome, ActionError> {
        if self.draft_name_blank() {
            return Ok(Outcome::Skipped);
        }
        info!(
            "compress: {} -> {}",
            self.committed.full_path(),
            self.draft.full_path()
        );
        let request = ActionRequest::Compress {
            path: self.committed.full_path(),
            destination: self.draft.full_path(),
        };
        self.execute(api, &api.config().compress_url, request, "error_compressing")
            .await
    }

    /// Extract the committed archive into the draft destination.
    pub async fn extract(&mut self, api: &ApiClient) -> Result<Outcome, ActionError> {
        info!(
            "extract: {} -> {}",
            self.committed.full_path(),
            self.draft.full_path()
        );
        let request = ActionRequest::Extract {
            path: self.committed.full_path(),
            source_file: self.committed.full_path(),
            destination: self.draft.full_path(),
        };
        self.execute(api, &api.config().extract_url, request, "error_extracting")
            .await
    }

    /// Fetch the file content. On success the text is stored into both
    /// snapshots.
    pub async fn get_content(&mut self, api: &ApiClient) -> Result<Outcome, ActionError> {
        info!("get content: {}", self.draft.full_path());
        let request = ActionRequest::EditFile {
            path: self.draft.full_path(),
        };
        self.execute(api, &api.config().get_content_url, request, "error_getting_content")
            .await
    }

    /// Delete the entry. The containing collection drops the entity once the
    /// server confirms.
    pub async fn remove(&mut self, api: &ApiClient) -> Result<Outcome, ActionError> {
        info!("delete: {}", self.draft.full_path());
        let request = ActionRequest::Delete {
            path: self.draft.full_path(),
        };
        self.execute(api, &api.config().remove_url, request, "error_deleting")
            .await
    }

    /// Save the draft content back to the server.
    pub async fn edit(&mut self, api: &ApiClient) -> Result<Outcome, ActionError> {
        info!("save file: {}", self.draft.full_path());
        let request = ActionRequest::SaveFile {
            content: self.draft.content.clone(),
            path: self.draft.full_path(),
        };
        self.execute(api, &api.config().edit_url, request, "error_modifying")
            .await
    }

    /// Apply the draft permissions, optionally to the whole subtree.
    pub async fn change_permissions(&mut self, api: &ApiClient) -> Result<Outcome, ActionError> {
        info!("change permissions: {}", self.draft.full_path());
        let request = ActionRequest::ChangePermissions {
            path: self.draft.full_path(),
            perms: self.draft.perms.to_octal(),
            perms_code: self.draft.perms.to_code(),
            recursive: self.draft.recursive,
        };
        self.execute(api, &api.config().permissions_url, request, "error_changing_perms")
            .await
    }

    /// URL for downloading or previewing the committed entry. No request is
    /// issued; the caller decides what to do with the URL.
    pub fn preview_url(&self, config: &FileManagerConfig, preview: bool) -> String {
        let query = format!(
            "mode=download&preview={}&path={}",
            preview,
            urlencoding::encode(&self.committed.full_path())
        );
        [config.download_file_url.as_str(), query.as_str()].join("?")
    }

    /// Download URL for files; directories are not downloadable.
    pub fn download_url(&self, config: &FileManagerConfig) -> Option<String> {
        if self.is_folder() {
            None
        } else {
            Some(self.preview_url(config, false))
        }
    }

    pub fn is_folder(&self) -> bool {
        self.committed.kind == EntryKind::Dir
    }

    pub fn is_editable(&self, config: &FileManagerConfig) -> bool {
        !self.is_folder() && config.is_editable_file_pattern.is_match(&self.committed.name)
    }

    /// Folders are not excluded here; the pattern alone decides.
    pub fn is_image(&self, config: &FileManagerConfig) -> bool {
        config.is_image_file_pattern.is_match(&self.committed.name)
    }

    pub fn is_compressible(&self) -> bool {
        self.is_folder()
    }

    pub fn is_extractable(&self, config: &FileManagerConfig) -> bool {
        !self.is_folder() && config.is_extractable_file_pattern.is_match(&self.committed.name)
    }
}
