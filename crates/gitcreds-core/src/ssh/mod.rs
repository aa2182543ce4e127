//! SSH key installation and the `core.sshCommand` Git should run.

use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::gitconfig::store::restrict_to_owner;

pub const PRIVATE_KEY_FILE: &str = "private_key";
pub const KNOWN_HOSTS_FILE: &str = "known_hosts";

/// Accept a private key in OpenSSH or PEM form, or one that was base64
/// encoded once more. The key must parse without a passphrase. The result
/// always ends with a newline, which OpenSSH requires.
pub fn normalize_private_key(raw: &str) -> Result<String> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let decoded = STANDARD
        .decode(compact.as_bytes())
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .filter(|text| parse_private_key(text).is_ok());

    let mut key = match decoded {
        Some(text) => {
            info!("base64 decoded SSH key");
            text
        }
        None => raw.to_string(),
    };

    parse_private_key(&key)
        .map_err(|e| Error::configuration(format!("could not parse supplied SSH key: {e}")))?;
    if !key.ends_with('\n') {
        key.push('\n');
    }
    Ok(key)
}

fn parse_private_key(text: &str) -> std::result::Result<(), russh_keys::Error> {
    russh_keys::decode_secret_key(text, None).map(|_| ())
}

/// Write the key as `<dir>/private_key`, readable only by the owner.
pub fn install_private_key(dir: &Path, key: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    let path = dir.join(PRIVATE_KEY_FILE);
    std::fs::write(&path, key).map_err(|e| Error::io(&path, e))?;
    restrict_to_owner(&path)?;
    Ok(path)
}

/// Write `<dir>/known_hosts`: the user's own known hosts followed by the
/// supplied entries. An unreadable user file counts as empty.
pub fn write_known_hosts(home: &Path, dir: &Path, extra: &str) -> Result<PathBuf> {
    let user_path = home.join(".ssh").join(KNOWN_HOSTS_FILE);
    let user = if user_path.is_file() {
        std::fs::read_to_string(&user_path).unwrap_or_else(|e| {
            debug!(path = %user_path.display(), error = %e, "ignoring unreadable known_hosts");
            String::new()
        })
    } else {
        String::new()
    };

    let mut content = String::new();
    push_block(&mut content, &format!("from {}", user_path.display()), &user);
    push_block(&mut content, "from ssh-known-hosts input", extra);

    std::fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    let path = dir.join(KNOWN_HOSTS_FILE);
    std::fs::write(&path, content).map_err(|e| Error::io(&path, e))?;
    Ok(path)
}

fn push_block(out: &mut String, label: &str, body: &str) {
    out.push_str(&format!("# Begin {label}\n"));
    out.push_str(body);
    if !body.is_empty() && !body.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&format!("# End {label}\n"));
}

/// `ssh -i <key> [-o StrictHostKeyChecking=yes -o CheckHostIP=no] -o UserKnownHostsFile=<file>`
pub fn ssh_command(key: &Path, strict: bool, known_hosts: &Path) -> String {
    let mut command = format!("ssh -i {}", shell_escape(&key.to_string_lossy()));
    if strict {
        command.push_str(" -o StrictHostKeyChecking=yes -o CheckHostIP=no");
    }
    command.push_str(" -o UserKnownHostsFile=");
    command.push_str(&shell_escape(&known_hosts.to_string_lossy()));
    command
}

/// Quote for a POSIX shell.
pub fn shell_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('\'');
    for ch in value.chars() {
        if ch == '\'' {
            escaped.push_str("'\\''");
        } else {
            escaped.push(ch);
        }
    }
    escaped.push('\'');
    escaped
}
