// Copyright 2018 Google LLC
//
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use apod::config::{self, ClientConfig, ServerConfig, UpstreamConfig};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;

#[derive(Parser)]
#[command(name = "apod", version, about = "Date-keyed lookups against the NASA APOD API over RPC")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the RPC server.
    Server {
        /// Address to listen on.
        #[arg(long, default_value = config::DEFAULT_ADDR)]
        listen_addr: SocketAddr,
        /// Base URL of the upstream APOD API.
        #[arg(long, default_value = config::DEFAULT_UPSTREAM_URL)]
        upstream_url: String,
        /// API key sent with every upstream request.
        #[arg(long, default_value = config::DEFAULT_API_KEY)]
        api_key: String,
    },
    /// Send one lookup and print the result.
    Client {
        /// Server address to connect to.
        #[arg(long, default_value = config::DEFAULT_ADDR)]
        server_addr: SocketAddr,
        /// Date to look up, YYYY-MM-DD. Defaults to today.
        date: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    apod::init_tracing()?;

    match Cli::parse().command {
        Command::Server {
            listen_addr,
            upstream_url,
            api_key,
        } => {
            apod::server::run(ServerConfig {
                listen_addr,
                upstream: UpstreamConfig {
                    base_url: upstream_url,
                    api_key,
                },
            })
            .await
        }
        Command::Client { server_addr, date } => {
            let date = date.unwrap_or_else(apod::client::today);
            apod::client::run(
                ClientConfig {
                    server_addr,
                    deadline: config::DEFAULT_DEADLINE,
                },
                date,
            )
            .await
        }
    }
}
