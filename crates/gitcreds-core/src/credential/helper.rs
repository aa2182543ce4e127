//! Credential helper operations as invoked by Git.

use std::io::{BufRead, Write};
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::gitconfig::ConfigFile;

use super::{CredentialTable, GitCredential};

/// Operation named by Git on the helper's command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelperOperation {
    Get,
    Store,
    Erase,
}

impl HelperOperation {
    /// `None` for operations this helper does not know, which Git expects
    /// to be ignored.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "get" => Some(Self::Get),
            "store" => Some(Self::Store),
            "erase" => Some(Self::Erase),
            _ => None,
        }
    }
}

/// Run one operation against the side file at `config_file`.
///
/// `store` and `erase` read nothing and succeed; credentials are only ever
/// written by `configure`.
pub fn run_operation(
    operation: HelperOperation,
    config_file: &Path,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<()> {
    match operation {
        HelperOperation::Get => {
            let config = ConfigFile::new(config_file).open_existing()?;
            get(&CredentialTable::from_config(&config)?, input, output)
        }
        HelperOperation::Store | HelperOperation::Erase => {
            debug!(?operation, "ignoring unsupported helper operation");
            Ok(())
        }
    }
}

/// Answer a `get` request. No matching entry is an empty response.
pub fn get(table: &CredentialTable, input: &mut impl BufRead, output: &mut impl Write) -> Result<()> {
    let request = GitCredential::read_from(input)?;

    let Some(entry) = table.lookup(
        request.protocol.as_deref().unwrap_or_default(),
        request.host.as_deref().unwrap_or_default(),
        request.path.as_deref().unwrap_or_default(),
    ) else {
        return Ok(());
    };

    let response = GitCredential {
        password: entry.decoded_password()?,
        username: entry.username.clone(),
        ..Default::default()
    };
    response.write_to(output)?;
    output
        .flush()
        .map_err(|e| Error::protocol(format!("could not write response: {e}")))
}
