// Copyright (c) 2021, Facebook, Inc. and its affiliates
// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use linkmap_network::network::NetworkClient;
use linkmap_network::transport;
use linkmap_types::base_types::*;
use linkmap_types::messages::*;

use anyhow::bail;
use std::time::Duration;
use structopt::StructOpt;
use tracing::subscriber::set_global_default;
use tracing_subscriber::EnvFilter;

#[derive(StructOpt)]
#[structopt(
    name = "LinkMap Client",
    about = "Query and mutate a running path mapping service",
    rename_all = "kebab-case"
)]
struct ClientOpt {
    /// Address of the service
    #[structopt(long, default_value = "127.0.0.1")]
    host: String,
    /// Port of the service
    #[structopt(long, default_value = "9500")]
    port: u16,
    /// Maximum size of datagrams
    #[structopt(long, default_value = transport::DEFAULT_MAX_DATAGRAM_SIZE)]
    buffer_size: usize,
    /// Timeout for sending and receiving, in seconds
    #[structopt(long, default_value = "4")]
    timeout_secs: u64,
    #[structopt(subcommand)]
    cmd: ClientCommands,
}

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case")]
enum ClientCommands {
    /// Resolve the ordered chain of links between two endpoints
    Query { from: String, to: String },
    /// Insert a directed edge, minting or reusing the link id for the key
    AddEdge {
        from: String,
        to: String,
        key: String,
        /// Maximum sustainable throughput in megabits/second
        #[structopt(long)]
        max_rate: Option<f64>,
        /// Free-text label for the link
        #[structopt(long)]
        desc: Option<String>,
    },
    /// Overwrite the attributes of an issued link id
    UpdateLink {
        id: String,
        #[structopt(long)]
        max_rate: Option<f64>,
        #[structopt(long)]
        desc: Option<String>,
    },
    /// Delete one specific directed edge
    RemoveEdge { from: String, to: String, id: String },
    /// Retire a link and every edge labeled with it
    RemoveLink { id: String },
}

fn address(value: &str) -> Result<NodeAddress, anyhow::Error> {
    if value.is_empty() {
        bail!("Node addresses must be non-empty");
    }
    Ok(NodeAddress::from(value))
}

fn link_id(value: &str) -> Result<LinkId, anyhow::Error> {
    Ok(value.parse::<LinkId>()?)
}

fn print_ack(response: TopologyInfoResponse) -> Result<(), anyhow::Error> {
    match response.link {
        Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
        None => println!("OK"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber_builder =
        tracing_subscriber::fmt::Subscriber::builder().with_env_filter(env_filter);
    let subscriber = subscriber_builder.with_writer(std::io::stderr).finish();
    set_global_default(subscriber).expect("Failed to set subscriber");

    let options = ClientOpt::from_args();
    let timeout = Duration::from_secs(options.timeout_secs);
    let client = NetworkClient::new(
        options.host,
        options.port,
        options.buffer_size,
        timeout,
        timeout,
    );

    match options.cmd {
        ClientCommands::Query { from, to } => {
            let request = PathRequest {
                from: address(&from)?,
                to: address(&to)?,
            };
            match client.query_path(request).await {
                Ok(response) => {
                    println!("{}", serde_json::to_string_pretty(&response.links)?);
                }
                Err(error) if error.is_not_found() => {
                    // The documented consumer interpretation of not-found.
                    println!("No known path ({error}); assume unlimited bandwidth.");
                }
                Err(error) => return Err(error.into()),
            }
        }
        ClientCommands::AddEdge {
            from,
            to,
            key,
            max_rate,
            desc,
        } => {
            let response = client
                .topology_command(TopologyCommand::AddEdge {
                    from: address(&from)?,
                    to: address(&to)?,
                    key: LinkKey::from(key.as_str()),
                    max_rate,
                    desc,
                })
                .await?;
            print_ack(response)?;
        }
        ClientCommands::UpdateLink { id, max_rate, desc } => {
            let response = client
                .topology_command(TopologyCommand::UpdateLink {
                    id: link_id(&id)?,
                    max_rate,
                    desc,
                })
                .await?;
            print_ack(response)?;
        }
        ClientCommands::RemoveEdge { from, to, id } => {
            let response = client
                .topology_command(TopologyCommand::RemoveEdge {
                    from: address(&from)?,
                    to: address(&to)?,
                    id: link_id(&id)?,
                })
                .await?;
            print_ack(response)?;
        }
        ClientCommands::RemoveLink { id } => {
            let response = client
                .topology_command(TopologyCommand::RemoveLink { id: link_id(&id)? })
                .await?;
            print_ack(response)?;
        }
    }
    Ok(())
}
