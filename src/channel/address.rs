use std::fmt;

use thiserror::Error;

/// Path of the chat bot socket on the site.
pub const DEFAULT_ENDPOINT_PATH: &str = "/ws/chat-bot/";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("origin `{origin}` has no scheme (expected http:// or https://)")]
    MissingScheme { origin: String },
    #[error("origin scheme `{scheme}` is not http or https")]
    UnsupportedScheme { scheme: String },
    #[error("origin `{origin}` has no host")]
    MissingHost { origin: String },
    #[error("endpoint path `{path}` must start with `/`")]
    RelativePath { path: String },
}

/// Scheme and host of the site page the chat belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOrigin {
    secure: bool,
    host: String,
}

impl PageOrigin {
    pub fn new(scheme: &str, host: impl Into<String>) -> Result<Self, AddressError> {
        let secure = match scheme.to_ascii_lowercase().as_str() {
            "https" => true,
            "http" => false,
            _ => {
                return Err(AddressError::UnsupportedScheme {
                    scheme: scheme.to_owned(),
                })
            }
        };

        let host = host.into();
        if host.is_empty() {
            return Err(AddressError::MissingHost {
                origin: format!("{scheme}://"),
            });
        }

        Ok(Self { secure, host })
    }

    /// Parses `scheme://host[:port]`, ignoring any path, query or fragment.
    pub fn parse(origin: &str) -> Result<Self, AddressError> {
        let origin = origin.trim();
        let (scheme, rest) =
            origin
                .split_once("://")
                .ok_or_else(|| AddressError::MissingScheme {
                    origin: origin.to_owned(),
                })?;

        let host_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
        let host = &rest[..host_end];
        if host.is_empty() {
            return Err(AddressError::MissingHost {
                origin: origin.to_owned(),
            });
        }

        Self::new(scheme, host)
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}

/// Fully qualified `ws://` or `wss://` address of a chat channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelAddress(String);

impl ChannelAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Socket address for `endpoint_path` on the page origin; secure pages get `wss`.
pub fn derive_channel_address(
    origin: &PageOrigin,
    endpoint_path: &str,
) -> Result<ChannelAddress, AddressError> {
    if !endpoint_path.starts_with('/') {
        return Err(AddressError::RelativePath {
            path: endpoint_path.to_owned(),
        });
    }

    let scheme = if origin.is_secure() { "wss" } else { "ws" };
    Ok(ChannelAddress(format!(
        "{scheme}://{}{endpoint_path}",
        origin.host()
    )))
}
