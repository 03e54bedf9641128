// Copyright (c) 2021, Facebook, Inc. and its affiliates
// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use linkmap::config::{ServiceConfig, TopologyConfig};
use linkmap::server_lib::Server;
use linkmap::utils::Config;
use linkmap_core::mapper::PathMapperState;

use std::path::Path;
use structopt::StructOpt;
use tracing::subscriber::set_global_default;
use tracing_subscriber::EnvFilter;

#[derive(StructOpt)]
#[structopt(
    name = "LinkMap Server",
    about = "A path mapping service: answers which network links connect two endpoints",
    rename_all = "kebab-case"
)]
struct ServerOpt {
    /// Path to the service configuration file (an empty one will be created if missing)
    #[structopt(long, default_value = "./service.conf")]
    config: String,
    /// Optional topology preload file applied at startup
    #[structopt(long)]
    topology: Option<String>,
    /// Override the listening port from the config file
    #[structopt(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber_builder =
        tracing_subscriber::fmt::Subscriber::builder().with_env_filter(env_filter);
    let subscriber = subscriber_builder.with_writer(std::io::stderr).finish();
    set_global_default(subscriber).expect("Failed to set subscriber");

    let options = ServerOpt::from_args();
    let config = ServiceConfig::read_or_create(Path::new(&options.config))?;
    let port = options.port.unwrap_or(config.port);

    let state = PathMapperState::new(config.resolve_deadline());
    let server = Server::new(config.host.clone(), port, state, config.buffer_size);

    if let Some(topology_path) = &options.topology {
        let topology = TopologyConfig::read_or_create(Path::new(topology_path))?;
        server.preload_topology(&topology)?;
    }

    server.spawn().await?.join().await?;
    Ok(())
}
