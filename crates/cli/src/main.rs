use clap::{Args, Parser, Subcommand};
use ferrous_resolver_domain::{CliOverrides, RecordType};
use tracing::info;

mod bootstrap;
mod di;
mod query;
mod server;

#[derive(Parser)]
#[command(name = "ferrous-resolver")]
#[command(version = "0.1.0")]
#[command(about = "Ferrous Resolver - Iterative DNS resolver with a response cache")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(Subcommand)]
enum Command {
    /// Run the resolver (default)
    Serve(ServeArgs),

    /// Send one recursive query to a running server and print the response
    Query(QueryArgs),
}

#[derive(Args)]
struct ServeArgs {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// DNS server port
    #[arg(short = 'p', long)]
    dns_port: Option<u16>,

    /// DNS server port, positional form
    #[arg(value_name = "PORT", conflicts_with = "dns_port")]
    port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Root server every resolution starts from (IP:PORT)
    #[arg(long, value_name = "ADDR")]
    root: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Write logs to this file instead of stdout
    #[arg(long, value_name = "FILE")]
    log_file: Option<String>,
}

#[derive(Args)]
struct QueryArgs {
    /// Domain name to look up
    name: String,

    /// Record type (A, NS, MX, TXT, TYPE65, ...)
    #[arg(short = 't', long = "type", default_value = "A")]
    record_type: RecordType,

    /// Server to ask
    #[arg(short = 's', long, default_value = "127.0.0.1:53")]
    server: String,

    /// Seconds to wait for the response
    #[arg(long, default_value_t = 5)]
    timeout: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Query(args)) => query::run(args).await,
        Some(Command::Serve(args)) => serve(args).await,
        None => serve(cli.serve).await,
    }
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let cli_overrides = CliOverrides {
        dns_port: args.dns_port.or(args.port),
        bind_address: args.bind,
        root_server: args.root,
        log_level: args.log_level,
        log_file: args.log_file,
    };

    let config = bootstrap::load_config(args.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config)?;

    info!("Starting Ferrous Resolver v{}", env!("CARGO_PKG_VERSION"));

    let services = di::DnsServices::new(&config)?;
    let listen_addr = config.listen_addr()?;

    server::start_dns_server(listen_addr, services, config.server.max_concurrent_queries).await?;

    info!("Server shutdown complete");
    Ok(())
}
