//! `parley chat` — Interactive or single-message chat mode.

use parley_agent::{CompletionRouter, ConversationContext, DEFAULT_SYSTEM_DIRECTIVE, Reply, UploadPolicy};
use parley_config::AppConfig;
use parley_core::error::ProviderError;
use parley_core::message::Role;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{self, AsyncBufReadExt, BufReader};

pub async fn run(
    message: Option<String>,
    file: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let (gemini, weather) = match parley_providers::build_from_config(&config) {
        Ok(providers) => providers,
        Err(ProviderError::NotConfigured(reason)) => {
            print_key_help(&reason);
            return Err("API keys missing. See above for setup instructions.".into());
        }
        Err(e) => return Err(e.into()),
    };

    let router = CompletionRouter::new(Arc::new(gemini), Arc::new(weather), &config.model)
        .with_temperature(config.temperature)
        .with_max_tokens(config.max_output_tokens);

    let directive = config
        .context
        .system_prompt
        .clone()
        .unwrap_or_else(|| DEFAULT_SYSTEM_DIRECTIVE.to_string());
    let context = ConversationContext::new(directive).with_max_messages(config.context.max_messages);

    let mut session = Session {
        router,
        context,
        policy: UploadPolicy::from_config(&config.uploads),
        pending: None,
    };

    if let Some(msg) = message {
        if let Some(path) = file {
            session.attach(path)?;
        }

        eprint!("  Thinking...");
        let reply = session.send(&msg).await;
        eprint!("\r              \r");

        if reply.is_failure() {
            return Err(reply.into_text().into());
        }
        println!("{reply}");
        return Ok(());
    }

    print_banner(&config);

    let mut lines = BufReader::new(io::stdin()).lines();

    prompt_marker()?;
    while let Some(line) = lines.next_line().await? {
        match Input::parse(&line) {
            Input::Empty => {}
            Input::Exit => break,
            Input::Clear => {
                session.context.reset();
                println!("  Conversation cleared.\n");
            }
            Input::History => {
                println!();
                for line in history_lines(&session.context) {
                    println!("  {line}");
                }
                println!();
            }
            Input::Attach(path) => match session.attach(path) {
                Ok(()) => println!("  Attached. It will be sent with your next message.\n"),
                Err(e) => eprintln!("  [Error] {e}\n"),
            },
            Input::Prompt(text) => {
                eprint!("  ...");
                let reply = session.send(text).await;
                eprint!("\r     \r");
                println!();
                if reply.is_failure() {
                    eprintln!("  [Error] {reply}");
                } else {
                    for line in reply.text().lines() {
                        println!("  Assistant > {line}");
                    }
                }
                println!();
            }
        }
        prompt_marker()?;
    }

    println!();
    println!("  Goodbye!");
    println!();

    Ok(())
}

/// One terminal conversation: the router, its context, and a staged attachment.
struct Session {
    router: CompletionRouter,
    context: ConversationContext,
    policy: UploadPolicy,
    pending: Option<PathBuf>,
}

impl Session {
    /// Stage a file for the next prompt after checking upload limits.
    fn attach(&mut self, path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
        self.policy.check(&path)?;
        self.pending = Some(path);
        Ok(())
    }

    async fn send(&mut self, prompt: &str) -> Reply {
        let attachment = self.pending.take();
        let reply = self
            .router
            .respond(&self.context, prompt, attachment.as_deref())
            .await;

        if !reply.is_failure() {
            self.context.append(prompt, reply.text());
        }
        reply
    }
}

/// A line typed at the interactive prompt.
#[derive(Debug, PartialEq)]
enum Input<'a> {
    Empty,
    Exit,
    Clear,
    History,
    Attach(PathBuf),
    Prompt(&'a str),
}

impl<'a> Input<'a> {
    fn parse(line: &'a str) -> Self {
        let line = line.trim();
        match line {
            "" => Input::Empty,
            "exit" | "quit" | "/exit" | "/quit" | ":q" => Input::Exit,
            "/clear" => Input::Clear,
            "/history" => Input::History,
            _ => match line.strip_prefix("/attach") {
                Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => {
                    let path = rest.trim();
                    if path.is_empty() {
                        Input::Prompt(line)
                    } else {
                        Input::Attach(Path::new(path).to_path_buf())
                    }
                }
                _ => Input::Prompt(line),
            },
        }
    }
}

/// Capacity counts the system directive, so `max_messages` of 20 keeps 9 full exchanges.
fn memory_summary(max_messages: usize) -> String {
    let exchanges = max_messages.saturating_sub(1) / 2;
    format!("last {exchanges} exchanges ({max_messages} messages incl. system directive)")
}

/// Timestamped transcript lines for `/history`, system directive omitted.
fn history_lines(context: &ConversationContext) -> Vec<String> {
    context
        .snapshot()
        .iter()
        .filter(|m| m.role() != Role::System)
        .map(|m| {
            format!(
                "[{}] {}: {}",
                m.timestamp().format("%H:%M:%S"),
                m.role().label(),
                m.content()
            )
        })
        .collect()
}

fn prompt_marker() -> std::io::Result<()> {
    print!("  You > ");
    std::io::stdout().flush()
}

fn print_banner(config: &AppConfig) {
    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║          Parley — Interactive Mode           ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Model:     {}", config.model);
    println!("  Memory:    {}", memory_summary(config.context.max_messages));
    println!("  Weather:   {} units", config.weather.units);
    println!();
    println!("  Type your message and press Enter.");
    println!("  /attach <path>  send a file with the next message");
    println!("  /history        show the conversation so far");
    println!("  /clear          forget the conversation");
    println!("  Type 'exit' or Ctrl+C to quit.");
    println!();
}

fn print_key_help(reason: &str) {
    eprintln!();
    eprintln!("  ERROR: {reason}");
    eprintln!();
    eprintln!("  Set these environment variables (or put them in a .env file):");
    eprintln!("    GEMINI_API_KEY=...    (https://aistudio.google.com/app/apikey)");
    eprintln!("    WEATHER_API_KEY=...   (https://openweathermap.org/api)");
    eprintln!();
    eprintln!("  Or add them to your config file:");
    eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
    eprintln!();
}
