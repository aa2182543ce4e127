//! gitcreds core library
//!
//! Points Git at a chosen transport and credential source for a set of
//! repositories: `insteadOf` rewrites between clone URL spellings, a
//! credential helper answering from a side file, or an installed SSH key.

pub mod alias;
pub mod config;
pub mod configure;
pub mod context;
pub mod credential;
pub mod error;
pub mod gitconfig;
pub mod provider;
pub mod ssh;
pub mod types;

pub use error::{Error, Result};

/// Re-exports of commonly used types
pub mod prelude {
    // Inputs and orchestration
    pub use crate::config::{Auth, EventContext, Inputs, Settings};
    pub use crate::configure::{ConfigureReport, Configurator};
    pub use crate::context::AppContext;

    // URL derivation
    pub use crate::alias::{AliasEntry, AliasMapping, resolve};
    pub use crate::provider::{ProviderRegistry, ServerUrls, UrlSource};
    pub use crate::types::{RepositoryPattern, Transport};

    // Credential helper
    pub use crate::credential::{
        CredentialTable, GitCredential, HelperOperation, run_operation, store_credential,
    };

    // Git config
    pub use crate::gitconfig::ConfigFile;

    pub use crate::error::{Error, Result};
}
