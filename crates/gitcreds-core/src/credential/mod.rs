//! Git credential helper: wire protocol, side-file lookup and operations.

pub mod helper;
pub mod protocol;
pub mod table;

pub use helper::{HelperOperation, run_operation};
pub use protocol::GitCredential;
pub use table::{CredentialEntry, CredentialTable, key_for_url, store_credential};
