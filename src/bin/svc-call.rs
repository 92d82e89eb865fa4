use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reqwest::header::HeaderMap;

use service_http::config::{load_config, LoadedConfig, SharedConfiguration};
use service_http::observability::logging;
use service_http::{register_http_helper, Auth, CallOptions, RequestContext, CALL_SEQUENCE_HEADER};

#[derive(Parser)]
#[command(name = "svc-call")]
#[command(about = "Issue one outbound service call tagged with g-callsec", long_about = None)]
struct Cli {
    /// Configuration file (TOML).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Configuration key holding the target scheme and host.
    #[arg(short, long, default_value = "Target:BaseUrl")]
    key: String,

    /// Use this base URL instead of looking the key up in the config file.
    #[arg(long)]
    base_url: Option<String>,

    /// Call sequence to treat as the inbound one.
    #[arg(long)]
    inbound_callsec: Option<String>,

    /// Name recorded in the call sequence.
    #[arg(long, default_value = "svc-call")]
    caller: String,

    /// Bearer token for the Authorization header.
    #[arg(long)]
    bearer: Option<String>,

    /// Timeout in milliseconds (defaults: 12000 for GET, 120000 for POST).
    #[arg(long)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// GET a path and print the body
    Get {
        path: String,
        /// Query parameter as key=value; may repeat
        #[arg(short, long = "query")]
        query: Vec<String>,
    },
    /// POST a JSON body to a path and print the response
    Post {
        path: String,
        #[arg(short, long)]
        body: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let LoadedConfig { app, mut values } = match &cli.config {
        Some(path) => load_config(path)?,
        None => LoadedConfig::default(),
    };
    logging::init_logging(&app.helper.log_level);

    if let Some(base_url) = &cli.base_url {
        values.insert(&cli.key, base_url.clone());
    }

    let helper = register_http_helper(&app.helper, SharedConfiguration::new(values))?;
    let client = helper.client(cli.key.clone());

    let mut headers = HeaderMap::new();
    if let Some(callsec) = &cli.inbound_callsec {
        headers.insert(CALL_SEQUENCE_HEADER, callsec.parse()?);
    }
    let ctx = if headers.is_empty() {
        RequestContext::background()
    } else {
        RequestContext::new(headers, "")
    };

    let mut options = CallOptions::new();
    if let Some(token) = cli.bearer {
        options = options.with_auth(Auth::bearer(token));
    }
    if let Some(ms) = cli.timeout_ms {
        options = options.with_timeout_ms(ms);
    }

    let body = match cli.command {
        Commands::Get { path, query } => {
            let pairs: Vec<(&str, &str)> = query
                .iter()
                .map(|q| q.split_once('=').unwrap_or((q.as_str(), "")))
                .collect();
            client
                .execute_get_string(&ctx, &path, &pairs, &cli.caller, options)
                .await?
        }
        Commands::Post { path, body } => {
            let json: serde_json::Value = serde_json::from_str(&body)?;
            client
                .execute_post_string(&ctx, &path, &json, &cli.caller, options)
                .await?
        }
    };

    match serde_json::from_str::<serde_json::Value>(&body) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", body),
    }
    Ok(())
}
