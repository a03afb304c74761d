// Copyright 2018 Google LLC
//
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The querying half: one connection, one RPC, one printed result.

use crate::config::ClientConfig;
use crate::ApodClient;
use std::time::Instant;
use tarpc::{client, context, tokio_serde::formats::Json};

/// Today's local date in the strict wire format.
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// Connects to the server, issues a single lookup bounded by the configured
/// deadline, and prints the record. Lookup rejections and transport failures
/// both bubble up as errors.
pub async fn run(config: ClientConfig, date: String) -> anyhow::Result<()> {
    let transport =
        tarpc::serde_transport::tcp::connect(config.server_addr, Json::default).await?;
    let client = ApodClient::new(client::Config::default(), transport).spawn();

    let mut ctx = context::current();
    ctx.deadline = Instant::now() + config.deadline;

    let record = client
        .get_record(ctx, date)
        .await?
        .map_err(|e| anyhow::anyhow!("lookup rejected: {e}"))?;

    println!("{}: {}", record.date, record.title);
    println!("url: {}", record.url);
    if !record.hd_url.is_empty() {
        println!("hdurl: {}", record.hd_url);
    }
    println!(
        "media type: {} (service version {})",
        record.media_type, record.service_version
    );
    println!("{}", record.explanation);

    Ok(())
}
