use std::{net::SocketAddr, str::FromStr};

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use sporlrelay::{
    api::AppState,
    config::{self, Config},
    error, server,
    spotify::auth::build_login_url,
    warning,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the relay server
    Serve(ServeOptions),

    /// Print the Spotify authorization URL
    LoginUrl,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ServeOptions {
    /// Address to bind, overrides SERVER_ADDRESS
    #[clap(long)]
    pub address: Option<String>,

    /// Open the relay's login page in the default browser once listening
    #[clap(long)]
    pub open: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

fn load_config() -> Config {
    match Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("Invalid configuration: {}", e),
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Serve(opt) => serve(opt).await,
        Command::LoginUrl => println!("{}", build_login_url(&load_config().spotify)),
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}

async fn serve(opt: ServeOptions) {
    let mut config = load_config();
    if let Some(address) = opt.address {
        config.server_address = match SocketAddr::from_str(&address) {
            Ok(addr) => addr,
            Err(e) => error!("Failed to parse server address: {}", e),
        };
    }

    let state = match AppState::new(config.spotify) {
        Ok(state) => state,
        Err(e) => error!("Failed to build HTTP client: {}", e),
    };

    let listener = match server::bind(config.server_address).await {
        Ok(listener) => listener,
        Err(e) => error!("Failed to bind {}: {}", config.server_address, e),
    };

    if opt.open {
        let login_url = match listener.local_addr() {
            Ok(addr) => format!("http://{addr}/login"),
            Err(_) => format!("http://{}/login", config.server_address),
        };
        if webbrowser::open(&login_url).is_err() {
            warning!(
                "Failed to open browser. Please navigate to the following URL manually:\n{}",
                login_url
            )
        }
    }

    if let Err(e) = server::serve(listener, state).await {
        error!("Server stopped: {}", e);
    }
}
