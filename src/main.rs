use clap::Parser;
use sdg_chat::core::config::{load_config, resolve};
use sdg_chat::{LogLevel, tui};
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "sdg-chat", about = "Terminal chat client for the SDGs AI assistant", version)]
struct Args {
    /// Chat endpoint URL (overrides SDG_CHAT_ENDPOINT and the config file)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Milliseconds between typewriter steps
    #[arg(long)]
    typing_interval_ms: Option<u64>,

    /// Log level written to sdg-chat.log
    #[arg(long, default_value_t, value_enum)]
    log_level: LogLevel,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to sdg-chat.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("sdg-chat.log") {
        let _ = WriteLogger::init(args.log_level.into(), log_config, log_file);
    }

    log::info!(
        "sdg-chat {} starting up (log level {:?})",
        env!("CARGO_PKG_VERSION"),
        args.log_level
    );

    let file_config = load_config().unwrap_or_else(|e| {
        log::warn!("Ignoring config file: {}", e);
        Default::default()
    });
    let config = resolve(
        &file_config,
        args.endpoint.as_deref(),
        args.typing_interval_ms,
    );

    tui::run(config)
}
