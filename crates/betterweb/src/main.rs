use clap::{Parser, Subcommand};
use tracing::error;

use betterweb::{Feature, HeaderSigner, SiteError, SiteResult, Timestamp};
use betterweb_core::ProtocolVersion;
use betterweb_headers::{decode_welcome_header, encode_hello_header};

/// better-web protocol tooling: key generation, token issuance, and header
/// inspection.
#[derive(Parser, Debug)]
#[command(name = "betterweb", version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate an Ed25519 key pair and print it as base64 (SPKI public,
    /// PKCS#8 private)
    Keygen,

    /// Mint a signed hello header value
    Issue {
        /// Issuer private key, base64 (raw or PKCS#8)
        #[arg(long)]
        private_key: String,

        /// Token lifetime in seconds from now
        #[arg(long, default_value = "86400")]
        expires_in: u64,

        /// Feature name to grant (repeatable), e.g. ADS_OFF
        #[arg(long = "feature")]
        features: Vec<String>,

        /// Bind the token to a site id (UUID text)
        #[arg(long)]
        client_id: Option<String>,
    },

    /// Decode a welcome header value and print its fields as JSON
    Inspect {
        /// The raw header value
        value: String,
    },
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("betterweb=debug,betterweb_headers=debug,betterweb_core=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("betterweb=info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> SiteResult<()> {
    match cli.command {
        Commands::Keygen => cmd_keygen(),
        Commands::Issue {
            private_key,
            expires_in,
            features,
            client_id,
        } => cmd_issue(&private_key, expires_in, &features, client_id.as_deref()),
        Commands::Inspect { value } => cmd_inspect(&value),
    }
}

fn cmd_keygen() -> SiteResult<()> {
    let signer = HeaderSigner::generate();
    println!("Public Key:  {}", signer.verifier().export_spki_base64());
    println!("Private Key: {}", signer.export_pkcs8_base64());
    Ok(())
}

fn cmd_issue(
    private_key: &str,
    expires_in: u64,
    feature_names: &[String],
    client_id: Option<&str>,
) -> SiteResult<()> {
    let signer = HeaderSigner::import_base64(private_key)?;

    let features = feature_names
        .iter()
        .map(|name| {
            Feature::from_name(name).ok_or_else(|| {
                let valid: Vec<&str> = Feature::all().iter().map(|f| f.name()).collect();
                SiteError::Config(format!(
                    "unknown feature '{name}'; valid features: {}",
                    valid.join(" | ")
                ))
            })
        })
        .collect::<SiteResult<Vec<Feature>>>()?;

    let expires_at =
        Timestamp::from_seconds(Timestamp::now().seconds_since_epoch + expires_in);
    let value = encode_hello_header(
        ProtocolVersion::CURRENT,
        expires_at,
        &features,
        client_id,
        &signer,
    )?;

    println!("{value}");
    Ok(())
}

fn cmd_inspect(value: &str) -> SiteResult<()> {
    match decode_welcome_header(value) {
        Some(header) => {
            let json = serde_json::to_string_pretty(&header)
                .map_err(|e| SiteError::Config(format!("could not render header: {e}")))?;
            println!("{json}");
            Ok(())
        }
        None => Err(SiteError::Config(
            "value is not a decodable welcome header".into(),
        )),
    }
}
