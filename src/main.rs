use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

mod config;

use boostbot::boost::numerology::Numerology;
use boostbot::deliver::console::ConsoleSink;
use boostbot::deliver::mastodon::MastodonSink;
use boostbot::deliver::matrix::MatrixSink;
use boostbot::deliver::BoostSink;
use boostbot::lnd::LndClient;
use boostbot::message::{compose, ProtocolProfile};
use boostbot::pump::{EventPump, PumpOptions};
use boostbot::route::{ChannelMap, RouteRule};

/// Boostbot: relay podcasting 2.0 Lightning boosts to chat destinations.
///
/// Subscribes to an LND node's invoice stream, decodes boost TLV payloads,
/// and republishes each qualifying boost as a chat message.
#[derive(Parser)]
#[command(name = "boostbot", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Subscribe to the invoice stream and relay boosts
    Run {
        /// LND REST host
        #[arg(long, default_value = "127.0.0.1")]
        lnd_host: String,

        /// LND REST port
        #[arg(long, default_value = "8080")]
        lnd_port: u16,

        /// Path to a readonly macaroon
        #[arg(long, default_value = "readonly.macaroon")]
        lnd_macaroon: PathBuf,

        /// Path to the node's TLS certificate
        #[arg(long, default_value = "tls.cert")]
        lnd_tlscert: PathBuf,

        /// Default destination channel (repeatable)
        #[arg(long = "channel", default_value = "#boostbot")]
        channels: Vec<String>,

        /// Routing rule `kind:value=channel` where kind is podcast, feed,
        /// url, or guid (repeatable)
        #[arg(long = "route")]
        routes: Vec<RouteRule>,

        /// Skip boosts below this many sats
        #[arg(long)]
        minimum_donation: Option<u64>,

        /// Only relay boosts from these sending apps (repeatable)
        #[arg(long = "allowed-name")]
        allowed_names: Vec<String>,

        /// Post to Mastodon (MASTODON_INSTANCE / MASTODON_ACCESS_TOKEN)
        #[arg(long)]
        mastodon: bool,

        /// Send to Matrix rooms (MATRIX_HOMESERVER / MATRIX_USER / MATRIX_PASSWORD)
        #[arg(long)]
        matrix: bool,

        /// Print boosts to the terminal (default when no other destination)
        #[arg(long)]
        console: bool,
    },

    /// Print the numerology for an amount
    Annotate {
        /// Amount in sats
        amount: u64,
    },

    /// Decode a boost payload file and print the composed message
    Preview {
        /// Path to a JSON boost payload
        payload: PathBuf,

        /// Settled invoice amount used when the payload declares none
        #[arg(long, default_value = "0")]
        amount: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("boostbot=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            lnd_host,
            lnd_port,
            lnd_macaroon,
            lnd_tlscert,
            channels,
            routes,
            minimum_donation,
            allowed_names,
            mastodon,
            matrix,
            console,
        } => {
            let config = config::Config::load()?;

            let channel_map = ChannelMap::from_rules(&routes);
            for channel in channel_map.channels_not_in(&channels) {
                warn!(channel = %channel, "Routing rule points at a channel not in --channel");
            }

            // Any startup failure below is fatal: the bot never runs
            // half-configured.
            let mut sinks: Vec<Box<dyn BoostSink>> = Vec::new();
            if mastodon {
                config.require_mastodon()?;
                let sink =
                    MastodonSink::connect(&config.mastodon_instance, &config.mastodon_access_token)
                        .await?;
                sinks.push(Box::new(sink));
            }
            if matrix {
                config.require_matrix()?;
                let sink = MatrixSink::login(
                    &config.matrix_homeserver,
                    &config.matrix_user,
                    &config.matrix_password,
                )
                .await?;
                sinks.push(Box::new(sink));
            }
            if console || sinks.is_empty() {
                sinks.push(Box::new(ConsoleSink));
            }

            let lnd = LndClient::connect(&lnd_host, lnd_port, &lnd_macaroon, &lnd_tlscert)?;
            let mut subscription = lnd.subscribe_invoices().await?;

            info!(
                channels = channels.len(),
                rules = routes.len(),
                "Boostbot starting"
            );

            let pump = EventPump::new(
                channel_map,
                channels,
                sinks,
                PumpOptions {
                    minimum_donation,
                    allowed_names,
                },
            );
            pump.run(&mut subscription).await?;
        }

        Commands::Annotate { amount } => {
            let decorated = Numerology::new().decorate(amount);
            if decorated.is_empty() {
                println!("{amount} sats: no numerology");
            } else {
                println!("{amount} sats: {decorated}");
            }
        }

        Commands::Preview { payload, amount } => {
            let bytes = std::fs::read(&payload)?;
            let record = boostbot::boost::decode(&bytes, amount)?;
            let symbols = Numerology::new().annotate(record.effective_sats());
            println!("{}", compose(&record, &symbols, &ProtocolProfile::plain()));
        }
    }

    Ok(())
}
