// Copyright 2018 Google LLC
//
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! An RPC proxy for NASA's Astronomy Picture of the Day (APOD) API. The
//! service exposes one RPC that validates a calendar date, fetches the
//! matching entry from the upstream HTTP API, and relays the decoded record.

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt::format::FmtSpan, prelude::*};

pub mod client;
pub mod config;
pub mod server;

/// One picture-of-the-day entry, field-for-field as the upstream API
/// serializes it. Fields the upstream omits decode as empty strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApodRecord {
    pub date: String,
    pub explanation: String,
    #[serde(rename = "hdurl")]
    pub hd_url: String,
    pub media_type: String,
    pub service_version: String,
    pub title: String,
    pub url: String,
}

/// Why a lookup failed. Travels back to the client inside the RPC reply;
/// every variant is scoped to the single request that produced it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum LookupError {
    /// The date was empty or did not match the strict `YYYY-MM-DD` layout.
    #[error("date must match the YYYY-MM-DD format")]
    InvalidDate,
    /// The upstream API could not be reached (connect failure or timeout).
    #[error("upstream API unreachable: {0}")]
    UpstreamUnreachable(String),
    /// The upstream API answered with a non-OK status.
    #[error("upstream API returned status {0}")]
    UpstreamStatus(u16),
    /// The upstream API answered 200 but the body did not decode.
    #[error("upstream API returned an undecodable body: {0}")]
    UpstreamBody(String),
}

/// This is the service definition. It defines one RPC, get_record, which
/// takes a calendar date and returns the matching record or a lookup error.
#[tarpc::service]
pub trait Apod {
    /// Returns the picture-of-the-day record for `date`, strict `YYYY-MM-DD`.
    async fn get_record(date: String) -> Result<ApodRecord, LookupError>;
}

/// Initializes a tracing subscriber writing to stderr, filtered by RUST_LOG.
pub fn init_tracing() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().with_span_events(FmtSpan::NEW | FmtSpan::CLOSE))
        .try_init()?;

    Ok(())
}
