use clap::Parser;
use llm_calc::config::cli::LogFormat;
use llm_calc::utils::error::ErrorSeverity;
use llm_calc::utils::{logger, validation::Validate};
use llm_calc::{AnthropicClient, CliConfig, ResultResolver, FAILURE_MARKER};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    match cli.log_format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }
    tracing::debug!("CLI config: {:?}", cli);

    let config = match cli.load_calc_config().and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    let resolver = match AnthropicClient::from_config(&config)? {
        Some(client) => {
            tracing::info!("🚀 Using model {}", client.model());
            ResultResolver::with_generator(client)
        }
        None => ResultResolver::local(),
    };

    match cli.expression() {
        Some(expression) => run_once(&resolver, expression.trim_end_matches('=')).await,
        None => run_interactive(&resolver).await,
    }
}

async fn run_once(resolver: &ResultResolver, expression: &str) -> anyhow::Result<()> {
    match resolver.resolve(expression).await {
        Ok(resolution) => {
            println!("{}", resolution.display_value());
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                "❌ Calculation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            println!("{}", FAILURE_MARKER);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
            Ok(())
        }
    }
}

async fn run_interactive(resolver: &ResultResolver) -> anyhow::Result<()> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout
        .write_all(b"llm-calc: type an expression and press Enter (quit to leave)\n")
        .await?;

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let input = line.trim();
        match input {
            "" => continue,
            "quit" | "exit" => break,
            _ => {}
        }

        let expression = input.trim_end_matches('=');
        let shown = resolver.resolve_for_display(expression).await;
        stdout.write_all(format!("{}\n", shown).as_bytes()).await?;
    }

    Ok(())
}
