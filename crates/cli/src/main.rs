//! swcache CLI - drive the request interceptor from the command line.
//!
//! Every run boots the configured version against the persistent store,
//! fires the requested event(s) and waits for background refreshes before
//! exiting. Output goes to stdout, logs to stderr.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use swcache_client::{EventOutcome, FetchConfig, HttpNetwork, Worker, WorkerContext, WorkerEvent, resolve};
use swcache_core::{AppConfig, CacheDb, Network, Request, Response};
use tracing_subscriber::EnvFilter;

mod host;

#[derive(Parser)]
#[command(name = "swcache")]
#[command(about = "Offline cache and request routing for web apps", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Precache the static asset manifest into the current version's partition
    Install,
    /// Install, then activate: delete partitions from other versions
    Activate,
    /// Send one request through the interceptor and print the response
    Fetch {
        /// Absolute URL, or a path resolved against the configured origin
        url: String,

        /// HTTP method
        #[arg(long, default_value = "GET")]
        method: String,

        /// Print response headers before the body
        #[arg(long)]
        include: bool,
    },
    /// Print the current version's partition name
    Version,
    /// List partitions with their entry counts
    Partitions,
    /// List the request URLs cached in one partition
    Keys {
        /// Partition name
        partition: String,
    },
    /// Delete one partition
    Purge {
        /// Partition name
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = AppConfig::load().context("failed to load configuration")?;

    match args.command {
        Command::Version => {
            println!("{}", config.version_tag());
            Ok(())
        }
        Command::Partitions => {
            let cache = CacheDb::open(&config.db_path).await?;
            for stats in cache.partition_stats().await? {
                println!("{}\t{}", stats.name, stats.entries);
            }
            Ok(())
        }
        Command::Keys { partition } => {
            let cache = CacheDb::open(&config.db_path).await?;
            if !cache.has_partition(&partition).await? {
                bail!("no such partition: {partition}");
            }
            let partition = cache.open_partition(&partition).await?;
            for url in cache.keys(&partition).await? {
                println!("{url}");
            }
            Ok(())
        }
        Command::Purge { name } => {
            let cache = CacheDb::open(&config.db_path).await?;
            if !cache.delete_partition(&name).await? {
                bail!("no such partition: {name}");
            }
            println!("deleted {name}");
            Ok(())
        }
        Command::Install => {
            let (worker, _) = boot(config).await?;
            worker.dispatch(WorkerEvent::Install).await?;
            println!("{}", worker.phase().await);
            Ok(())
        }
        Command::Activate => {
            let (worker, _) = boot(config).await?;
            worker.dispatch(WorkerEvent::Install).await?;
            worker.dispatch(WorkerEvent::Activate).await?;
            println!("{}", worker.phase().await);
            Ok(())
        }
        Command::Fetch { url, method, include } => {
            let (worker, network) = boot(config).await?;
            let url = resolve(&url, worker.context().origin())?;
            let request = Request::new(&method, url);

            let response = match worker.dispatch(WorkerEvent::Fetch(request.clone())).await? {
                EventOutcome::Respond(response) => response,
                _ => {
                    tracing::info!("not intercepted, fetching directly");
                    network.fetch(&request).await?
                }
            };
            print_response(&response, include);

            worker.settle().await;
            Ok(())
        }
    }
}

async fn boot(config: AppConfig) -> Result<(Worker, Arc<dyn Network>)> {
    let cache = CacheDb::open(&config.db_path).await?;
    let network: Arc<dyn Network> = Arc::new(HttpNetwork::new(&FetchConfig::from(&config))?);
    let ctx = WorkerContext::new(config, cache, network.clone(), Arc::new(host::CliHost))?;
    Ok((Worker::new(ctx), network))
}

fn print_response(response: &Response, include: bool) {
    if include {
        println!("{}", response.status);
        for (name, value) in &response.headers {
            println!("{name}: {value}");
        }
        println!();
    }
    println!("{}", response.body_text());
}
