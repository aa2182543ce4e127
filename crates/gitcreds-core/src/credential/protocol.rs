//! Git credential-helper wire format.
//!
//! Requests and responses are `key=value` lines terminated by `\n`. A request
//! ends at a blank line or end of input.

use std::io::{BufRead, Write};

use chrono::{DateTime, Utc};
use url::Url;

use crate::error::{Error, Result};

/// One credential request or response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitCredential {
    pub protocol: Option<String>,
    pub host: Option<String>,
    pub path: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub password_expiry_utc: Option<DateTime<Utc>>,
    pub oauth_refresh_token: Option<String>,
    /// `WWW-Authenticate` headers the server sent. Read only.
    pub wwwauth: Vec<String>,
}

impl GitCredential {
    /// Read a request. Immediate end of input is a valid empty request.
    pub fn read_from(reader: &mut impl BufRead) -> Result<Self> {
        let mut credential = Self::default();
        let mut line = String::new();

        loop {
            line.clear();
            let read = reader
                .read_line(&mut line)
                .map_err(|e| Error::protocol(format!("could not read request: {e}")))?;
            if read == 0 {
                break;
            }
            let Some(content) = line.strip_suffix('\n') else {
                return Err(Error::protocol(format!(
                    "request line '{line}' is not terminated by a newline"
                )));
            };
            if content.is_empty() {
                break;
            }
            let Some((key, value)) = content.split_once('=') else {
                return Err(Error::protocol(format!(
                    "request line '{content}' has no '='"
                )));
            };
            credential.apply(key, value)?;
        }

        Ok(credential)
    }

    fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "protocol" => self.protocol = Some(value.to_string()),
            "host" => self.host = Some(value.to_string()),
            "path" => self.path = Some(value.to_string()),
            "username" => self.username = Some(value.to_string()),
            "password" => self.password = Some(value.to_string()),
            "oauth_refresh_token" => self.oauth_refresh_token = Some(value.to_string()),
            "password_expiry_utc" => {
                let expiry = value
                    .parse::<i64>()
                    .ok()
                    .and_then(|secs| DateTime::from_timestamp(secs, 0))
                    .ok_or_else(|| {
                        Error::protocol(format!("invalid password_expiry_utc '{value}'"))
                    })?;
                self.password_expiry_utc = Some(expiry);
            }
            "url" => self.apply_url(value)?,
            "wwwauth[]" => {
                if value.is_empty() {
                    self.wwwauth.clear();
                } else {
                    self.wwwauth.push(value.to_string());
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn apply_url(&mut self, value: &str) -> Result<()> {
        let url = Url::parse(value).map_err(|source| Error::UrlParse {
            url: value.to_string(),
            source,
        })?;

        self.protocol = Some(url.scheme().to_string());
        self.host = Some(match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            (None, _) => String::new(),
        });
        let path = url.path().trim_start_matches('/');
        self.path = Some(if path.is_empty() { "/" } else { path }.to_string());
        Ok(())
    }

    /// Write the set fields. Nothing is written if any field would break the
    /// line format.
    pub fn write_to(&self, writer: &mut impl Write) -> Result<()> {
        let expiry = self.password_expiry_utc.map(|t| t.timestamp().to_string());
        let fields = [
            ("protocol", self.protocol.as_deref()),
            ("host", self.host.as_deref()),
            ("path", self.path.as_deref()),
            ("username", self.username.as_deref()),
            ("password", self.password.as_deref()),
            ("password_expiry_utc", expiry.as_deref()),
            ("oauth_refresh_token", self.oauth_refresh_token.as_deref()),
        ];

        let mut out = String::new();
        for (key, value) in fields {
            let Some(value) = value else { continue };
            if value.contains(['\0', '\n']) {
                return Err(Error::protocol(format!(
                    "{key} contains a NUL or newline character"
                )));
            }
            out.push_str(key);
            out.push('=');
            out.push_str(value);
            out.push('\n');
        }

        writer
            .write_all(out.as_bytes())
            .map_err(|e| Error::protocol(format!("could not write response: {e}")))
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
