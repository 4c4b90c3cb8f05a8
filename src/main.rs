use clap::Parser;

use vistagram::cli::{Cli, Commands};
use vistagram::config::{DEFAULT_CONFIG_PATH, get_config, init_config_from};
use vistagram::runtime::modes;
use vistagram::system::logging::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_config_from(cli.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH));

    match cli.command {
        // 配置生成不需要日志
        Some(Commands::Config { action }) => modes::run_config_command(action).await,
        command => {
            let _log_guard = match init_logging(&get_config().logging) {
                Ok(guard) => guard,
                Err(e) => {
                    eprintln!("{}", e.format_colored());
                    std::process::exit(1);
                }
            };

            match command {
                Some(Commands::Token { action }) => modes::run_token_command(action).await,
                _ => modes::run_server().await,
            }
        }
    }
}
