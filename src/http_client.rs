//! One pooled HTTP client shared by every outbound CRM/Qdrant call. Mirrors
//! `clients.py`'s `init_clients`/`get_http`/`close_clients` triad, but as an
//! owned handle the supervisor constructs once and hands to builders instead
//! of a lazily-initialized module global.

use reqwest::Client;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);
const READ_WRITE_TIMEOUT: Duration = Duration::from_secs(10);
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(3);
const MAX_IDLE_CONNECTIONS: usize = 50;

/// Builds the single pooled client used for the lifetime of the process.
/// Connections beyond `max idle per host` are simply not kept warm, which is
/// the closest `reqwest` equivalent to httpx's `max_connections` limit — the
/// hard cap on concurrent sockets is enforced by the OS/ulimit, matching the
/// original's reliance on the underlying connector rather than queuing.
pub fn build_shared_client() -> reqwest::Result<Client> {
    Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(READ_WRITE_TIMEOUT)
        .pool_idle_timeout(POOL_IDLE_TIMEOUT)
        .pool_max_idle_per_host(MAX_IDLE_CONNECTIONS)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_without_error() {
        assert!(build_shared_client().is_ok());
    }
}
