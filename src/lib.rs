//! Client-side model for a remote file-management API.
//!
//! An [`Entity`] is one remote file-system entry held as two snapshots: the
//! state last confirmed by the server and the draft a UI edits in place. The
//! nine remote actions (create folder, rename, copy, compress, extract, read,
//! delete, write, change permissions) all follow the same protocol against an
//! abstract [`Transport`]: mark busy, post a `mode`-tagged request, normalize
//! the response, commit the draft on success or record the error, and clear
//! the busy flag on every exit path.

pub mod client;
pub mod config;
pub mod entity;
pub mod path;
pub mod perms;
pub mod protocol;
pub mod transport;

pub use client::ApiClient;
pub use config::{ConfigError, FileManagerConfig, Translator};
pub use entity::{ActionError, Entity, EntryKind, Outcome, Snapshot};
pub use perms::Permissions;
pub use protocol::{ActionRequest, Interpreted, ListingRecord};
pub use transport::{HttpTransport, Transport, TransportError};
