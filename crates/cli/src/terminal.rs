//! Interactive terminal for the chat agent.

use std::io::Write;

use shrike_agent::ChatAgent;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Run one turn, printing streamed deltas as they arrive.
pub async fn stream_turn(agent: &ChatAgent, input: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut rx = agent.call_stream(input).await?;
    let mut stdout = std::io::stdout();

    // Busy indicator until the first chunk lands
    eprint!("...");
    let mut waiting = true;

    while let Some(item) = rx.recv().await {
        if waiting {
            eprint!("\r   \r");
            waiting = false;
        }
        match item {
            Ok(delta) => {
                print!("{delta}");
                stdout.flush()?;
            }
            Err(e) => {
                println!();
                return Err(e.into());
            }
        }
    }
    if waiting {
        eprint!("\r   \r");
    }
    println!();
    Ok(())
}

/// The interactive read-eval-print loop.
pub async fn run(
    agent: &ChatAgent,
    provider: &str,
    model: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("shrike — {provider} / {model}");
    println!("Type a message, or /help for commands.");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    prompt()?;
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            prompt()?;
            continue;
        }

        match line {
            "/exit" | "/quit" | "exit" => break,
            "/help" => {
                print_help();
            }
            _ if line.starts_with("/read ") => {
                let path = line["/read ".len()..].trim();
                match std::fs::read_to_string(path) {
                    Ok(content) => {
                        if let Err(e) = stream_turn(agent, &content).await {
                            eprintln!("error: {e}");
                        }
                    }
                    Err(e) => eprintln!("error: cannot read {path}: {e}"),
                }
            }
            _ if line.starts_with('/') => {
                eprintln!("unknown command: {line} (try /help)");
            }
            _ => {
                if let Err(e) = stream_turn(agent, line).await {
                    eprintln!("error: {e}");
                }
            }
        }

        prompt()?;
    }

    println!();
    Ok(())
}

fn prompt() -> std::io::Result<()> {
    print!("> ");
    std::io::stdout().flush()
}

fn print_help() {
    println!("Commands:");
    println!("  /read <path>   send the contents of a file as the next message");
    println!("  /help          show this help");
    println!("  /exit          quit");
}
