// Copyright 2018 Google LLC
//
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Startup configuration. Endpoints are injected into the server and client
//! at construction so both can be pointed at test addresses.

use std::net::SocketAddr;
use std::time::Duration;

/// Default address the server listens on and the client connects to.
pub const DEFAULT_ADDR: &str = "127.0.0.1:9000";
/// Base URL of the public APOD API.
pub const DEFAULT_UPSTREAM_URL: &str = "https://api.nasa.gov";
/// NASA's rate-limited demo key.
pub const DEFAULT_API_KEY: &str = "DEMO_KEY";
/// How long the client waits for a reply.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(5);

/// Where the picture-of-the-day data actually comes from.
#[derive(Clone, Debug)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub api_key: String,
}

impl UpstreamConfig {
    /// Full URL of the lookup endpoint, minus query parameters.
    pub fn endpoint(&self) -> String {
        format!("{}/planetary/apod", self.base_url.trim_end_matches('/'))
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_UPSTREAM_URL.to_owned(),
            api_key: DEFAULT_API_KEY.to_owned(),
        }
    }
}

/// Everything the serving half needs at startup.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    pub upstream: UpstreamConfig,
}

/// Everything the querying half needs at startup.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub server_addr: SocketAddr,
    pub deadline: Duration,
}
