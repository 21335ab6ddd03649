use docchat::cli::{commands, Cli};
use docchat::utils::logging::{filter_directive, init_tracing};
use owo_colors::OwoColorize;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();
    let no_color = cli.no_color;

    if let Err(e) = run(cli).await {
        if no_color {
            eprintln!("Error: {}", e);
        } else {
            eprintln!("{} {}", "Error:".red().bold(), e);
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> docchat::Result<()> {
    // Load environment variables from .env before reading any configuration
    dotenvy::dotenv().ok();

    let config = commands::resolve_config(&cli)?;
    init_tracing(
        &filter_directive(&config.logging.level, cli.verbose),
        config.logging.json,
    );

    commands::execute(cli, config).await
}
