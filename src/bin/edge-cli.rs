use std::path::PathBuf;

use axum::http::{header, HeaderMap, HeaderValue, Uri};
use clap::{Parser, Subcommand};

use storefront_edge::config::loader::{load_config, ConfigError};
use storefront_edge::{EdgeConfig, EdgeRouter};

#[derive(Parser)]
#[command(name = "edge-cli")]
#[command(about = "Inspect storefront edge decisions offline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the decision the edge would make for a path
    Decide {
        /// Request path, optionally with a query (e.g. /brands?page=2)
        path: String,

        /// Cookie to send, as name=value (repeatable)
        #[arg(long = "cookie")]
        cookies: Vec<String>,

        /// Accept-Language header value
        #[arg(long)]
        accept_language: Option<String>,

        /// Configuration file (defaults when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Validate a configuration file
    CheckConfig { path: PathBuf },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Decide {
            path,
            cookies,
            accept_language,
            config,
        } => {
            let config = match config {
                Some(path) => load_config(&path)?,
                None => EdgeConfig::default(),
            };
            let router = EdgeRouter::from_config(&config)?;

            let uri: Uri = path.parse()?;
            let mut headers = HeaderMap::new();
            if !cookies.is_empty() {
                headers.insert(header::COOKIE, HeaderValue::from_str(&cookies.join("; "))?);
            }
            if let Some(value) = accept_language {
                headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_str(&value)?);
            }

            let decision = router.decide(&uri, &headers);
            println!("{}", serde_json::to_string_pretty(&decision)?);
        }
        Commands::CheckConfig { path } => match load_config(&path) {
            Ok(_) => println!("{}: ok", path.display()),
            Err(ConfigError::Validation(errors)) => {
                for error in errors.iter() {
                    eprintln!("{}: {}", path.display(), error);
                }
                std::process::exit(1);
            }
            Err(e) => return Err(e.into()),
        },
    }

    Ok(())
}
