//! ai-gpt-cli: command-line front end for the completion and chat endpoints.
//!
//! Usage:
//!   ai-gpt-cli complete <prompt> [OPTIONS]     One-shot text completion
//!   ai-gpt-cli chat [OPTIONS]                  Interactive chat, one turn per line

use ai_lib_gpt::{AiClient, AiClientBuilder, Model};
use anyhow::{bail, Context};
use futures::StreamExt;
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct Options {
    model: Option<Model>,
    temperature: Option<f64>,
    max_tokens: Option<u32>,
    stream: bool,
    record_replies: bool,
    positional: Vec<String>,
}

fn parse_options(args: &[String]) -> anyhow::Result<Options> {
    let mut opts = Options::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--model" => {
                let value = iter.next().context("--model needs a value")?;
                opts.model = Some(value.parse::<Model>()?);
            }
            "--temperature" => {
                let value = iter.next().context("--temperature needs a value")?;
                opts.temperature = Some(value.parse().context("invalid --temperature")?);
            }
            "--max-tokens" => {
                let value = iter.next().context("--max-tokens needs a value")?;
                opts.max_tokens = Some(value.parse().context("invalid --max-tokens")?);
            }
            "--stream" => opts.stream = true,
            "--record-replies" => opts.record_replies = true,
            flag if flag.starts_with("--") => bail!("unknown option: {flag}"),
            other => opts.positional.push(other.to_string()),
        }
    }
    Ok(opts)
}

fn build_client(opts: &Options) -> anyhow::Result<AiClient> {
    let mut builder = AiClientBuilder::from_env().context("failed to configure client")?;
    if let Some(model) = &opts.model {
        builder = builder.model(model.clone());
    }
    if let Some(t) = opts.temperature {
        builder = builder.temperature(t);
    }
    if let Some(n) = opts.max_tokens {
        builder = builder.max_tokens(n);
    }
    if opts.record_replies {
        builder = builder.record_replies(true);
    }
    Ok(builder.build()?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    match args[1].as_str() {
        "complete" => cmd_complete(parse_options(&args[2..])?).await,
        "chat" => cmd_chat(parse_options(&args[2..])?).await,
        "version" | "--version" | "-V" => {
            println!("ai-gpt-cli {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!(
        r#"ai-gpt-cli: completion and chat from the terminal

USAGE:
    ai-gpt-cli <COMMAND> [OPTIONS]

COMMANDS:
    complete <prompt>           Complete a single prompt
    chat                        Interactive chat (empty line or /quit exits, /clear resets history)
    version                     Show version information
    help                        Show this help message

OPTIONS:
    --model <id>                Model wire id, e.g. gpt-4
    --temperature <f64>         Sampling temperature
    --max-tokens <n>            Cap on generated tokens
    --stream                    Print the reply as it arrives (always on for chat)
    --record-replies            Keep assistant replies in chat history

ENVIRONMENT:
    OPENAI_API_KEY              API key (the OS keyring is checked first)
    AI_BASE_URL                 API base URL
    AI_MODEL, AI_TEMPERATURE, AI_MAX_TOKENS
    RUST_LOG                    Log filter (default: warn)"#
    );
}

async fn cmd_complete(opts: Options) -> anyhow::Result<()> {
    if opts.positional.is_empty() {
        bail!("complete needs a prompt");
    }
    let prompt = opts.positional.join(" ");
    let client = build_client(&opts)?;

    if opts.stream {
        let mut stream = client.complete_stream(prompt).await?;
        let mut out = io::stdout();
        while let Some(piece) = stream.next().await {
            write!(out, "{}", piece?)?;
            out.flush()?;
        }
        writeln!(out)?;
    } else {
        let response = client.complete(prompt).await?;
        match response.text() {
            Some(text) => println!("{}", text.trim()),
            None => bail!("the response carried no text"),
        }
    }
    Ok(())
}

async fn cmd_chat(opts: Options) -> anyhow::Result<()> {
    let mut client = build_client(&opts)?;
    let stdin = io::stdin();
    let mut out = io::stdout();

    loop {
        write!(out, "> ")?;
        out.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        match line {
            "" | "/quit" => break,
            "/clear" => {
                client.clear_history();
                continue;
            }
            "/history" => {
                for entry in client.historical() {
                    writeln!(out, "- {entry}")?;
                }
                continue;
            }
            _ => {}
        }

        let mut stream = client.chat_stream(line).await?;
        while let Some(piece) = stream.next().await {
            match piece {
                Ok(text) => {
                    write!(out, "{text}")?;
                    out.flush()?;
                }
                Err(e) => {
                    eprintln!("\nerror: {e}");
                    break;
                }
            }
        }
        writeln!(out)?;
    }
    Ok(())
}
