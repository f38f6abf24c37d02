use clap::Parser;
use config::{Settings, load_env_file};
use ledgerchat_core::{ChatSession, ConnectionParameters, MySqlDriver};
use llm::providers::OllamaProvider;
use llm::ModelProvider;

use clap_derive::Parser;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

const DEFAULT_MODEL: &str = "llama3";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Database host
    #[arg(long, env = "LEDGERCHAT_HOST")]
    host: Option<String>,

    /// Database port
    #[arg(long, env = "LEDGERCHAT_PORT")]
    port: Option<u16>,

    /// Database username
    #[arg(long, env = "LEDGERCHAT_USERNAME")]
    username: Option<String>,

    /// Database password
    #[arg(long, env = "LEDGERCHAT_PASSWORD")]
    password: Option<String>,

    /// Database name
    #[arg(long, env = "LEDGERCHAT_DATABASE")]
    database: Option<String>,

    /// Model served by Ollama used for both completion calls
    #[arg(long)]
    model: Option<String>,

    /// Custom base URL for the Ollama API
    #[arg(long, env = "OLLAMA_BASE_URL")]
    ollama_url: Option<String>,

    /// Connect to the database immediately instead of waiting for /connect
    #[arg(long)]
    connect: bool,

    #[arg(long, short)]
    tracing: bool,
}

// Application state
struct AppState {
    session: ChatSession,
    params: ConnectionParameters,
    model_name: String,
}

fn setup_tracing(enable: bool) {
    if enable {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::TRACE)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Setting default subscriber failed");
    } else {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::ERROR)
            .with_writer(|| std::io::sink())
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Setting default subscriber failed");
    }
}

fn print_status_bar(model_name: &str, connected: bool, params: &ConnectionParameters) {
    let terminal_width: usize = 80;
    let target = if connected {
        format!("{}@{}", params.database, params.host)
    } else {
        "disconnected".to_string()
    };
    let status = format!(" {} • {} ", model_name, target);
    let padding = terminal_width.saturating_sub(status.len());
    let left_pad = padding / 2;
    let right_pad = padding - left_pad;

    println!("┌{}┐", "─".repeat(terminal_width - 2));
    println!("│{}{}{}│", " ".repeat(left_pad), status, " ".repeat(right_pad));
    println!("└{}┘", "─".repeat(terminal_width - 2));
}

async fn connect(state: &mut AppState) {
    match state.session.connect(&state.params).await {
        Ok(()) => {
            println!("Database connected successfully!");
            save_settings(state);
        }
        // Inline at the point of the connect action; prior state untouched.
        Err(e) => eprintln!("{}", e),
    }
}

fn save_settings(state: &AppState) {
    let mut settings = Settings::load();
    settings.connection.host = state.params.host.clone();
    settings.connection.port = state.params.port;
    settings.connection.username = state.params.username.clone();
    settings.connection.database = state.params.database.clone();
    settings.default_model = Some(state.model_name.clone());
    if let Err(e) = settings.set_password(&state.params.password) {
        tracing::debug!(error = %e, "could not encrypt password for settings");
    }
    if let Err(e) = settings.save() {
        tracing::debug!(error = %e, "could not save settings");
    }
}

// Slash command parsing and handling
mod commands {
    use super::*;

    pub enum Command {
        Quit,
        Help,
        Clear,
        Connect,
        Disconnect,
        Schema,
    }

    pub enum CommandResult {
        Continue,
        Exit,
    }

    impl Command {
        pub fn parse(input: &str) -> Result<Self, String> {
            if !input.starts_with('/') {
                return Err("Not a command".to_string());
            }

            let parts: Vec<&str> = input[1..].split_whitespace().collect();
            if parts.is_empty() {
                return Err("Empty command".to_string());
            }

            match parts[0] {
                "quit" | "exit" => Ok(Command::Quit),
                "help" => Ok(Command::Help),
                "clear" => Ok(Command::Clear),
                "connect" => Ok(Command::Connect),
                "disconnect" => Ok(Command::Disconnect),
                "schema" => Ok(Command::Schema),
                _ => Err(format!(
                    "Unknown command: /{}. Type /help for available commands.",
                    parts[0]
                )),
            }
        }

        pub async fn execute(self, state: &mut AppState) -> CommandResult {
            match self {
                Command::Quit => {
                    println!("Goodbye!");
                    CommandResult::Exit
                }
                Command::Help => {
                    print_help();
                    println!();
                    CommandResult::Continue
                }
                Command::Clear => {
                    state.session.clear();
                    println!("Conversation history cleared.");
                    println!();
                    CommandResult::Continue
                }
                Command::Connect => {
                    connect(state).await;
                    println!();
                    CommandResult::Continue
                }
                Command::Disconnect => {
                    state.session.disconnect().await;
                    println!("Disconnected.");
                    println!();
                    CommandResult::Continue
                }
                Command::Schema => {
                    println!("{}", state.session.schema());
                    println!();
                    CommandResult::Continue
                }
            }
        }
    }

    fn print_help() {
        println!("Available commands:");
        println!("  /connect               - Connect to the database");
        println!("  /disconnect            - Drop the database connection");
        println!("  /schema                - Show the schema used for query generation");
        println!("  /clear                 - Clear conversation history");
        println!("  /quit, /exit           - Exit the chat");
        println!("  /help                  - Show this help message");
        println!("  Ctrl+D                 - Exit the chat");
    }
}

#[tokio::main]
async fn main() {
    load_env_file();
    let args = Args::parse();

    setup_tracing(args.tracing);

    let settings = Settings::load();
    let params = ConnectionParameters {
        host: args
            .host
            .unwrap_or_else(|| settings.connection.host.clone()),
        port: args.port.unwrap_or(settings.connection.port),
        username: args
            .username
            .unwrap_or_else(|| settings.connection.username.clone()),
        password: args
            .password
            .or_else(|| settings.get_password())
            .unwrap_or_default(),
        database: args
            .database
            .unwrap_or_else(|| settings.connection.database.clone()),
    };

    let model_name = args
        .model
        .or_else(|| settings.default_model.clone())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let ollama_url = args
        .ollama_url
        .or_else(|| settings.ollama_url.clone());

    let provider = match &ollama_url {
        Some(url) => OllamaProvider::new(url),
        None => OllamaProvider::default(),
    };
    let Some(model) = provider.create_completion_model(&model_name) else {
        eprintln!("Failed to create model {}", model_name);
        return;
    };

    let mut state = AppState {
        session: ChatSession::new(model, Arc::new(MySqlDriver::new())),
        params,
        model_name,
    };

    if args.connect {
        connect(&mut state).await;
    }

    println!();
    println!("Ask about your inventory database. Type /help for commands, Ctrl+D or /quit to exit.");
    println!();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        let connected = state.session.is_connected().await;
        print_status_bar(&state.model_name, connected, &state.params);
        print!("> ");
        io::stdout().flush().unwrap();

        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                eprintln!("Error reading input: {}", e);
                break;
            }
            None => {
                println!();
                println!("Goodbye!");
                break;
            }
        };

        let input = line.trim();

        if input.is_empty() {
            continue;
        }

        // Try to parse as command
        if input.starts_with('/') {
            match commands::Command::parse(input) {
                Ok(cmd) => match cmd.execute(&mut state).await {
                    commands::CommandResult::Exit => break,
                    commands::CommandResult::Continue => continue,
                },
                Err(err) => {
                    println!("{}", err);
                    println!();
                    continue;
                }
            }
        }

        // Regular question: one strictly sequential turn per line.
        let answer = state.session.ask(input).await;
        println!("{}", answer.content);

        println!();
    }

    println!("Conversation had {} messages", state.session.transcript().len());
}
