// Copyright 2018 Google LLC
//
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The serving half: strict date validation and the upstream proxy call.

use crate::config::{ServerConfig, UpstreamConfig};
use crate::{Apod, ApodRecord, LookupError};
use chrono::NaiveDate;
use futures::{future, prelude::*};
use std::time::Instant;
use tarpc::{
    context,
    server::{incoming::Incoming, BaseChannel, Channel},
    tokio_serde::formats::Json,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Accepts exactly `YYYY-MM-DD` naming a real calendar date: the input must
/// parse under the strict layout, and reformatting the parsed date must
/// reproduce the input byte-for-byte. The round-trip check rejects inputs the
/// parser quietly tolerates, like unpadded months.
fn validate_date(date: &str) -> bool {
    // %Y tolerates a leading sign, and a negative year reformats to the
    // identical string, so signed years must be ruled out before the parse.
    if !date.starts_with(|c: char| c.is_ascii_digit()) {
        return false;
    }
    match NaiveDate::parse_from_str(date, DATE_FORMAT) {
        Ok(parsed) => parsed.format(DATE_FORMAT).to_string() == date,
        Err(_) => false,
    }
}

/// This is the type that implements the generated Apod trait. It is the
/// business logic and is used to start the server.
#[derive(Clone)]
pub struct ApodServer {
    http: reqwest::Client,
    upstream: UpstreamConfig,
}

impl ApodServer {
    pub fn new(upstream: UpstreamConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            upstream,
        }
    }

    /// One GET against the upstream API, bounded by the time remaining until
    /// `deadline`. Every failure maps to a per-request error.
    async fn fetch(&self, date: &str, deadline: Instant) -> Result<ApodRecord, LookupError> {
        let response = self
            .http
            .get(self.upstream.endpoint())
            .query(&[("api_key", self.upstream.api_key.as_str()), ("date", date)])
            .timeout(deadline.saturating_duration_since(Instant::now()))
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "upstream request failed");
                LookupError::UpstreamUnreachable(e.to_string())
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            tracing::warn!(%status, "upstream returned a non-OK status");
            return Err(LookupError::UpstreamStatus(status.as_u16()));
        }

        response.json::<ApodRecord>().await.map_err(|e| {
            tracing::warn!(error = %e, "upstream body did not decode");
            LookupError::UpstreamBody(e.to_string())
        })
    }
}

impl Apod for ApodServer {
    async fn get_record(
        self,
        ctx: context::Context,
        date: String,
    ) -> Result<ApodRecord, LookupError> {
        if date.is_empty() {
            tracing::warn!("rejected empty date");
            return Err(LookupError::InvalidDate);
        }
        if !validate_date(&date) {
            tracing::warn!(%date, "rejected malformed date");
            return Err(LookupError::InvalidDate);
        }

        tracing::info!(%date, "looking up record");
        self.fetch(&date, ctx.deadline).await
    }
}

async fn spawn(fut: impl Future<Output = ()> + Send + 'static) {
    tokio::spawn(fut);
}

/// Binds the listener and serves until the process is killed. Each accepted
/// connection gets its own channel; request handlers run as independent
/// tokio tasks.
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let server = ApodServer::new(config.upstream);

    let mut listener =
        tarpc::serde_transport::tcp::listen(config.listen_addr, Json::default).await?;
    tracing::info!(addr = %listener.local_addr(), "listening");
    listener.config_mut().max_frame_length(usize::MAX);
    listener
        // Ignore accept errors.
        .filter_map(|r| future::ready(r.ok()))
        .map(BaseChannel::with_defaults)
        // Limit channels to 1 per IP.
        .max_channels_per_key(1, |t| t.transport().peer_addr().unwrap().ip())
        .map(|channel| {
            let server = server.clone();
            channel.execute(server.serve()).for_each(spawn)
        })
        // Max 10 channels.
        .buffer_unordered(10)
        .for_each(|_| async {})
        .await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::validate_date;

    #[test]
    fn accepts_real_calendar_dates() {
        for date in ["2021-06-15", "1999-12-31", "2020-02-29", "0001-01-01"] {
            assert!(validate_date(date), "{date} should validate");
        }
    }

    #[test]
    fn rejects_anything_but_strict_iso_dates() {
        for date in [
            "",
            "2021-1-5",
            "2021-01-5",
            "21-01-05",
            "2021/01/05",
            "2021-13-01",
            "2021-00-10",
            "2021-02-30",
            "2019-02-29",
            "2021-06-15 ",
            "2021-06-15T00:00:00",
            "2021-06-15x",
            "-2021-06-15",
            "+2021-06-15",
            "not-a-date",
        ] {
            assert!(!validate_date(date), "{date:?} should be rejected");
        }
    }
}
