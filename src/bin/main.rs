//! Beelaunch CLI - wallet session server and client
//!
//!   beelaunch serve              → Run the HTTP server (default command)
//!   beelaunch status             → GET  /session
//!   beelaunch unlock             → POST /session/unlock
//!   beelaunch stop               → POST /session/stop
//!   beelaunch refresh            → POST /session/balance
//!
//! Configuration, highest priority first:
//!   CLI flags → BEELAUNCH_* env vars (.env is loaded first) → JSON config file
//!
//! Output format:
//!   --json     Output raw JSON (default for non-tty)
//!   --pretty   Pretty-print JSON (default for tty)

use anyhow::{anyhow, bail, Context, Result};
use beelaunch::core::paths::{self, env as vars, routes};
use beelaunch::logging::init_logging;
use beelaunch::{
    install_signal_handlers, create_router, HttpWalletClient, LaunchConfig, Orchestrator, ProcessLauncher,
    SessionConfig, SettlePolicy,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::env;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default config file looked up in the working directory
const CONFIG_FILE: &str = ".beelaunch.json";

fn main() {
    init_logging();

    let args: Vec<String> = env::args().collect();
    let opts = ParsedArgs::parse(&args[1..]);

    if opts.help {
        print_usage();
        return;
    }

    if opts.version {
        println!("beelaunch {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    // One control thread: every routine is multiplexed on it
    let result = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create runtime")
        .and_then(|rt| {
            rt.block_on(async {
                match opts.command.as_deref().unwrap_or("serve") {
                    "serve" => cmd_serve(&opts).await,
                    "status" => cmd_request(&opts, false, routes::SESSION).await,
                    "unlock" => cmd_request(&opts, true, routes::UNLOCK).await,
                    "stop" => cmd_request(&opts, true, routes::STOP).await,
                    "refresh" => cmd_request(&opts, true, routes::BALANCE).await,
                    cmd => Err(anyhow!("Unknown command: {}", cmd)),
                }
            })
        });

    let pretty = opts.pretty || (!opts.json && std::io::stdout().is_terminal());
    match result {
        Ok(output) => println!("{}", render(&output, pretty)),
        Err(e) => {
            eprintln!("{}", render(&json!({"error": format!("{:#}", e)}), pretty));
            std::process::exit(1);
        }
    }
}

fn render(value: &Value, pretty: bool) -> String {
    let rendered = if pretty { serde_json::to_string_pretty(value) } else { serde_json::to_string(value) };
    rendered.unwrap_or_else(|_| value.to_string())
}

#[derive(Default)]
struct ParsedArgs {
    command: Option<String>,
    config: Option<PathBuf>,
    workspace: Option<String>,
    data_dir: Option<PathBuf>,
    wallet_url: Option<String>,
    password: Option<String>,
    port: Option<u16>,
    server: Option<String>,
    json: bool,
    pretty: bool,
    help: bool,
    version: bool,
}

impl ParsedArgs {
    fn parse(args: &[String]) -> Self {
        // Load .env file if present
        if let Ok(contents) = std::fs::read_to_string(".env") {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    let value = value.trim().trim_matches('"');
                    if !value.is_empty() && env::var(key.trim()).is_err() {
                        env::set_var(key.trim(), value);
                    }
                }
            }
        }

        let mut opts = ParsedArgs::default();
        let mut positional = Vec::new();
        let mut i = 0;

        while i < args.len() {
            let arg = &args[i];
            let value = args.get(i + 1).cloned();
            let mut takes_value = true;
            match arg.as_str() {
                "--config" | "-c" => opts.config = value.map(PathBuf::from),
                "--workspace" | "-w" => opts.workspace = value,
                "--data-dir" | "-d" => opts.data_dir = value.map(PathBuf::from),
                "--wallet-url" => opts.wallet_url = value,
                "--password" => opts.password = value,
                "--port" | "-p" => opts.port = value.and_then(|v| v.parse().ok()),
                "--server" | "-s" => opts.server = value,
                _ => {
                    takes_value = false;
                    match arg.as_str() {
                        "--help" | "-h" => opts.help = true,
                        "--version" | "-V" => opts.version = true,
                        "--json" => opts.json = true,
                        "--pretty" => opts.pretty = true,
                        _ if !arg.starts_with('-') => positional.push(arg.clone()),
                        _ => {} // Ignore unknown flags
                    }
                }
            }
            i += if takes_value { 2 } else { 1 };
        }

        // First positional is command
        if !positional.is_empty() {
            opts.command = Some(positional.remove(0));
        }

        // Apply environment variables (lower priority than CLI args)
        if opts.config.is_none() {
            opts.config = env::var(vars::CONFIG).ok().filter(|s| !s.is_empty()).map(PathBuf::from);
        }
        if opts.port.is_none() {
            opts.port = env::var(vars::PORT).ok().and_then(|s| s.parse().ok());
        }
        if opts.wallet_url.is_none() {
            opts.wallet_url = env::var(vars::WALLET_URL).ok().filter(|s| !s.is_empty());
        }
        if opts.password.is_none() {
            opts.password = env::var(vars::WALLET_PASSWORD).ok().filter(|s| !s.is_empty());
        }

        opts
    }
}

fn print_usage() {
    println!(
        r#"beelaunch - Launchpad wallet session

USAGE:
    beelaunch [command] [options]

COMMANDS:
    serve                   Start HTTP server (default)
    status                  Show session and derived busy/ready
    unlock                  Start transport + wallet, fetch identity and balance
    stop                    Stop wallet (and transport if unused), lock session
    refresh                 Refresh balance

SERVER OPTIONS:
    --config, -c <path>     JSON config file (env: BEELAUNCH_CONFIG, default: .beelaunch.json)
    --workspace, -w <name>  Workspace name, prefixes container ids
    --data-dir, -d <path>   Container log root
    --wallet-url <url>      Wallet RPC base URL (env: BEELAUNCH_WALLET_URL)
    --password <secret>     Wallet credential (env: BEELAUNCH_WALLET_PASSWORD)
    --port, -p <port>       Server port (default: 18100, env: BEELAUNCH_PORT)

CLIENT OPTIONS:
    --server, -s <url>      Server base URL (default: http://127.0.0.1:<port>)

OUTPUT OPTIONS:
    --json                  Raw JSON output
    --pretty                Pretty-print JSON
    --version, -V           Print version

CONFIG FILE:
    {{
      "workspace": "default",
      "data_dir": "/var/lib/beelaunch",
      "startup_grace": 500,
      "wallet_url": "http://127.0.0.1:18143",
      "settle_min": 1000,
      "settle_timeout": 3000,
      "balance_debounce": 300,
      "containers": {{
        "tor": {{"program": "tor", "args": ["-f", "torrc"]}},
        "wallet": {{"program": "minotari_console_wallet", "args": ["--non-interactive"]}}
      }}
    }}

EXAMPLES:
    beelaunch serve --password hunter2
    beelaunch unlock
    beelaunch status --json | jq .session.balance
"#
    );
}

/// JSON config file: launcher settings plus server-only keys
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    port: Option<u16>,
    wallet_url: Option<String>,
    /// Settle floor after a fresh start, ms
    settle_min: Option<u64>,
    /// Settle poll timeout, ms
    settle_timeout: Option<u64>,
    /// Balance debounce, ms
    balance_debounce: Option<u64>,
    #[serde(flatten)]
    launch: LaunchConfig,
}

fn load_file_config(opts: &ParsedArgs) -> Result<FileConfig> {
    let path = match &opts.config {
        Some(path) => path.clone(),
        None => {
            let default = PathBuf::from(CONFIG_FILE);
            if !default.exists() {
                debug!("No {} found, using defaults", CONFIG_FILE);
                return Ok(FileConfig::default());
            }
            default
        }
    };
    let data = std::fs::read_to_string(&path).with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("Invalid config JSON in {}", path.display()))
}

async fn cmd_serve(opts: &ParsedArgs) -> Result<Value> {
    let file = load_file_config(opts)?;

    let mut launch = file.launch;
    if let Some(workspace) = &opts.workspace {
        launch.workspace = workspace.clone();
    }
    if let Some(data_dir) = &opts.data_dir {
        launch.data_dir = data_dir.clone();
    }
    if launch.containers.is_empty() {
        warn!("No containers configured; unlock will fail until the config lists tor and wallet");
    }

    let mut session = SessionConfig::new();
    if let Some(password) = &opts.password {
        session = session.with_credential(password.as_str());
    }
    if file.settle_min.is_some() || file.settle_timeout.is_some() {
        let min = Duration::from_millis(file.settle_min.unwrap_or(1000));
        let timeout = Duration::from_millis(file.settle_timeout.unwrap_or(3000));
        session = session.with_settle(SettlePolicy::poll(min, timeout, Duration::from_millis(250)));
    }
    if let Some(ms) = file.balance_debounce {
        session = session.with_balance_debounce(Duration::from_millis(ms));
    }

    let port = opts.port.or(file.port).unwrap_or(paths::DEFAULT_PORT);
    let wallet_url = opts.wallet_url.clone().or(file.wallet_url).unwrap_or_else(|| paths::DEFAULT_WALLET_URL.into());

    let launcher = Arc::new(ProcessLauncher::new(launch));
    let wallet = Arc::new(HttpWalletClient::new(&wallet_url));
    let orchestrator = Arc::new(Orchestrator::new(launcher.clone(), wallet, session));

    let shutdown = install_signal_handlers();
    let router = create_router(orchestrator.clone());
    let addr = format!("127.0.0.1:{}", port);

    let listener = tokio::net::TcpListener::bind(&addr).await.with_context(|| format!("Failed to bind {}", addr))?;
    info!(workspace = %launcher.config().workspace, %wallet_url, "Beelaunch server listening on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  {}            - Session and busy/ready", routes::SESSION);
    info!("  POST {}     - Unlock", routes::UNLOCK);
    info!("  POST {}       - Stop and lock", routes::STOP);
    debug!("  POST {}    - Refresh balance", routes::BALANCE);
    debug!("  GET  {}             - Health check", routes::HEALTH);

    // Run server until a signal arrives
    tokio::select! {
        result = axum::serve(listener, router) => {
            result.context("Server error")?;
        }
        _ = shutdown.wait() => {
            info!("Shutdown signal received, stopping session...");
        }
    }

    if orchestrator.statuses().iter().any(|s| s.running || s.pending) {
        if let Err(e) = orchestrator.stop().await {
            warn!("Session stop failed during shutdown: {}", e);
        }
    }
    launcher.shutdown().await;
    info!("Shutdown complete");

    Ok(json!({"status": "stopped"}))
}

/// Call a running server and return its JSON body
async fn cmd_request(opts: &ParsedArgs, post: bool, route: &str) -> Result<Value> {
    let base = opts
        .server
        .clone()
        .unwrap_or_else(|| format!("http://127.0.0.1:{}", opts.port.unwrap_or(paths::DEFAULT_PORT)));
    let url = format!("{}{}", base.trim_end_matches('/'), route);

    let client = reqwest::Client::new();
    let request = if post { client.post(&url) } else { client.get(&url) };
    let response = request.send().await.with_context(|| format!("Server not reachable at {}", base))?;
    let status = response.status();
    let body: Value = response.json().await.context("Bad response from server")?;
    if !status.is_success() {
        let message = body.get("error").and_then(Value::as_str).unwrap_or_else(|| status.as_str());
        bail!("{} ({})", message, status);
    }
    Ok(body)
}
