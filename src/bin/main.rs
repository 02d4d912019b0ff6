use budget_assistant::{assistant::Assistant, config::Config, session::Session};
use std::io::Write;
use tokio::io::{stdin, AsyncBufReadExt, BufReader};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing (quiet by default for the interactive console)
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .init();

    let offline = std::env::args().any(|arg| arg == "--offline");

    let assistant = if offline {
        info!("Running offline: deterministic fallback only");
        Assistant::offline()
    } else {
        // Missing credentials abort startup; pass --offline to skip the LLM
        let config = Config::from_env()?;
        Assistant::new(&config)
    };

    let mut session = Session::new();

    println!("\n=== Smart Budget Assistant ===\n");
    println!("Type 'exit' or 'quit' to end the conversation\n");

    let mut lines = BufReader::new(stdin()).lines();

    loop {
        print!("\nYou: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();

        if input.is_empty() {
            continue;
        }

        if matches!(input.to_lowercase().as_str(), "exit" | "quit") {
            println!("\nBot: Thanks for using Smart Budget Assistant! Goodbye! 👋");
            break;
        }

        let outcome = assistant.respond(&mut session, input).await;
        println!("\nBot: {}", outcome.reply);
    }

    Ok(())
}
