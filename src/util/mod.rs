//! Utility functions shared across the application.

use std::fmt::Display;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::warn;

/// Builder for URL query parameters.
///
/// Provides a fluent API for constructing query strings with proper URL
/// encoding. Parameters that were not supplied are simply not added, so
/// GitLab's own defaults apply.
///
/// # Example
/// ```ignore
/// let query = QueryBuilder::new()
///     .param("membership", true)
///     .optional("state", Some("opened"))
///     .optional("ref_name", None::<&str>)
///     .build();
/// // Returns "?membership=true&state=opened"
/// ```
#[derive(Default)]
pub struct QueryBuilder {
    params: Vec<(String, String)>,
}

impl QueryBuilder {
    /// Create a new empty query builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required parameter (always included).
    pub fn param(mut self, key: &str, value: impl Display) -> Self {
        self.params.push((
            key.to_string(),
            urlencoding::encode(&value.to_string()).into_owned(),
        ));
        self
    }

    /// Add an optional parameter (only included if Some).
    pub fn optional<T: Display>(self, key: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.param(key, v),
            None => self,
        }
    }

    /// Build the query string.
    ///
    /// Returns an empty string if no parameters were added,
    /// otherwise returns "?key1=value1&key2=value2...".
    pub fn build(self) -> String {
        if self.params.is_empty() {
            String::new()
        } else {
            format!(
                "?{}",
                self.params
                    .into_iter()
                    .map(|(k, v)| format!("{k}={v}"))
                    .collect::<Vec<_>>()
                    .join("&")
            )
        }
    }
}

/// Find an available port, starting from the preferred port.
///
/// Tries the preferred port, then the next 10 consecutive ports, then lets
/// the OS assign one.
pub async fn find_available_port(host: &str, preferred: u16) -> std::io::Result<u16> {
    // Try preferred port
    let addr: SocketAddr = format!("{}:{}", host, preferred)
        .parse()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    if let Ok(listener) = TcpListener::bind(addr).await {
        drop(listener);
        return Ok(preferred);
    }

    // Try next 10 ports
    for offset in 1..=10 {
        let port = preferred.saturating_add(offset);
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

        if let Ok(listener) = TcpListener::bind(addr).await {
            drop(listener);
            warn!(
                preferred,
                actual = port,
                "Preferred port unavailable, using alternate"
            );
            return Ok(port);
        }
    }

    // Let OS assign a port
    let addr: SocketAddr = format!("{}:0", host)
        .parse()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    let listener = TcpListener::bind(addr).await?;
    let port = listener.local_addr()?.port();
    drop(listener);
    warn!(preferred, actual = port, "Using OS-assigned port");
    Ok(port)
}
