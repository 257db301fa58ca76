//! steemdb
//!
//! Command-line access to a node's `database_api`. Every subcommand makes at
//! most one remote call and prints the decoded result as JSON.
//!
//! Usage:
//!   steemdb props                               [--rpc <url>]
//!   steemdb block <num>                         [--rpc <url>]
//!   steemdb ops <num> [--virtual-only]          [--rpc <url>]
//!   steemdb accounts <name>...                  [--rpc <url>]
//!   steemdb history <account> [--from <seq>] [--limit <n>] [--ops <name,...>]
//!   steemdb discussions <sort> [--tag <tag>] [--limit <n>]
//!   steemdb bitmask <name>...

use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use steemdb_core::{DiscussionQuery, DiscussionSortKey, HistoryStart, OperationBitmaskFilter};
use steemdb_rpc::{connect, DatabaseApi, Transport, TransportConfig};

// ── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "steemdb",
    version,
    about = "Query a node's database API"
)]
struct Args {
    /// Node RPC endpoint (http(s):// or ws(s)://).
    #[arg(long, global = true, default_value = "https://api.steemit.com")]
    rpc: String,

    /// Per-request timeout in seconds.
    #[arg(long, global = true, default_value_t = 30)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Head-of-chain state.
    Props,

    /// Median witness-voted chain parameters.
    ChainProps,

    /// Current median feed price.
    Price,

    /// Node constants.
    Config,

    /// Node version and chain id.
    Version,

    /// State blob for a front-end route.
    State {
        /// Route such as `@alice` or `trending/photography`.
        path: String,
    },

    /// Full block. Prints `null` past the head block.
    Block { num: u32 },

    /// Block header. Prints `null` past the head block.
    Header { num: u32 },

    /// Operations applied in a block.
    Ops {
        num: u32,
        /// Only virtual operations.
        #[arg(long)]
        virtual_only: bool,
    },

    /// Accounts by name.
    Accounts {
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Transaction by id (40 hex characters).
    Tx { id: String },

    /// Vesting delegations made by an account.
    Delegations {
        account: String,
        /// Delegatee to start from.
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },

    /// A window of posts in the given order.
    Discussions {
        /// One of: active, blog, cashout, children, comments, created, feed,
        /// hot, promoted, trending, votes.
        sort: DiscussionSortKey,
        /// Topic tag, or account name for `blog` and `feed`.
        #[arg(long)]
        tag: Option<String>,
        #[arg(long, default_value_t = 20)]
        limit: u32,
        /// Continue after this post (requires --start-permlink).
        #[arg(long, requires = "start_permlink")]
        start_author: Option<String>,
        #[arg(long, requires = "start_author")]
        start_permlink: Option<String>,
        /// Truncate bodies to this many bytes (0 = full body).
        #[arg(long)]
        truncate_body: Option<u32>,
    },

    /// Account history, newest first.
    History {
        account: String,
        /// Sequence number to walk back from. Defaults to the latest entry.
        #[arg(long)]
        from: Option<u64>,
        #[arg(long, default_value_t = 100)]
        limit: u32,
        /// Only these operation types (comma-separated names).
        #[arg(long, value_delimiter = ',')]
        ops: Vec<String>,
    },

    /// Print the history filter for a set of operation names. No remote call.
    Bitmask {
        #[arg(required = true)]
        names: Vec<String>,
    },
}

// ── Main ─────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn,steemdb=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let command = match args.command {
        Command::Bitmask { names } => return print_bitmask(&names),
        command => command,
    };

    let config = TransportConfig {
        url: args.rpc.clone(),
        request_timeout: Duration::from_secs(args.timeout_secs),
    };
    let transport = connect(&config)
        .await
        .with_context(|| format!("connecting to node at {}", config.url))?;
    info!(url = %config.url, "connected");
    let api = DatabaseApi::new(transport.as_ref());

    run(&api, command).await
}

async fn run(api: &DatabaseApi<'_, dyn Transport>, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Props => print_json(&api.get_dynamic_global_properties().await?),
        Command::ChainProps => print_json(&api.get_chain_properties().await?),
        Command::Price => print_json(&api.get_current_median_history_price().await?),
        Command::Config => print_json(&api.get_config().await?),
        Command::Version => print_json(&api.get_version().await?),
        Command::State { path } => print_json(&api.get_state(&path).await?),
        Command::Block { num } => print_json(&api.get_block(num).await?),
        Command::Header { num } => print_json(&api.get_block_header(num).await?),
        Command::Ops { num, virtual_only } => {
            let only_virtual = virtual_only.then_some(true);
            print_json(&api.get_operations(num, only_virtual).await?)
        }
        Command::Accounts { names } => print_json(&api.get_accounts(&names).await?),
        Command::Tx { id } => print_json(&api.get_transaction(&id).await?),
        Command::Delegations {
            account,
            from,
            limit,
        } => print_json(
            &api.get_vesting_delegations(&account, from.as_deref(), limit)
                .await?,
        ),
        Command::Discussions {
            sort,
            tag,
            limit,
            start_author,
            start_permlink,
            truncate_body,
        } => {
            let query = DiscussionQuery {
                tag,
                limit,
                start_author,
                start_permlink,
                truncate_body,
                ..Default::default()
            };
            print_json(&api.get_discussions(sort, &query).await?)
        }
        Command::History {
            account,
            from,
            limit,
            ops,
        } => {
            let from = from.map_or(HistoryStart::Latest, HistoryStart::Sequence);
            let filter = if ops.is_empty() {
                None
            } else {
                Some(OperationBitmaskFilter::from_names(&ops)?)
            };
            print_json(&api.get_account_history(&account, from, limit, filter).await?)
        }
        Command::Bitmask { names } => print_bitmask(&names),
    }
}

fn print_bitmask(names: &[String]) -> anyhow::Result<()> {
    let filter = OperationBitmaskFilter::from_names(names)?;
    print_json(&serde_json::json!({
        "low": filter.low,
        "high": filter.high,
        "ids": filter.ids(),
    }))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("encoding result")?;
    println!("{json}");
    Ok(())
}
