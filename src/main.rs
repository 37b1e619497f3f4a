//! labbot CLI
//!
//! Usage:
//!   labbot --text "jam buka lab"            # Single question
//!   labbot --interactive                    # Interactive chat
//!   labbot --serve                          # HTTP API server
//!   labbot --text "text" --json             # JSON output

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{ArgAction, Parser};
use colored::Colorize;
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use labbot::core::{run_server, ChatOrchestrator, InMemoryTranscriptStore, KnowledgeBase, RateLimiter, VocabularyTable};
use labbot::types::ChatReply;
use labbot::{
    ChatConfig, ClassifierConfig, LabbotError, DEFAULT_MAX_HISTORY, DEFAULT_MAX_INPUT_LENGTH,
    DEFAULT_MAX_REQUESTS_PER_MINUTE, DEFAULT_MIN_CONFIDENCE, DEFAULT_SESSION_LIFETIME_SECS, VERSION,
};

#[derive(Parser, Debug)]
#[command(
    name = "labbot",
    version = VERSION,
    about = "Lab assistant - answers questions about lab hours, rules and PC specs",
    long_about = "labbot classifies short questions into topics (jadwal, aturan, spesifikasi)\n\
                  and answers them from a JSON knowledge base.\n\n\
                  Modes:\n  \
                  --text         Answer one question\n  \
                  --interactive  Chat on stdin\n  \
                  --serve        HTTP API server"
)]
struct Args {
    /// Question to answer (single mode)
    #[arg(short, long)]
    text: Option<String>,

    /// Interactive mode - read questions from stdin
    #[arg(short, long)]
    interactive: bool,

    /// Run as HTTP API server
    #[arg(short, long)]
    serve: bool,

    /// Server address
    #[arg(long, default_value = "127.0.0.1:5000")]
    addr: String,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Show category and score
    #[arg(long)]
    verbose: bool,

    /// Knowledge base JSON file
    #[arg(long, env = "KB_FILE", default_value = "knowledge_base.json")]
    kb: PathBuf,

    /// Vocabulary JSON file (array of {name, keywords}); built-in lab vocabulary if absent
    #[arg(long, env = "VOCAB_FILE")]
    vocab: Option<PathBuf>,

    /// Minimum confidence score (0-100)
    #[arg(long, env = "MIN_CONFIDENCE", default_value_t = DEFAULT_MIN_CONFIDENCE)]
    min_confidence: u8,

    /// Maximum question length in characters
    #[arg(long, env = "MAX_INPUT_LENGTH", default_value_t = DEFAULT_MAX_INPUT_LENGTH)]
    max_input_length: usize,

    /// Exchanges kept per session
    #[arg(long, env = "MAX_HISTORY", default_value_t = DEFAULT_MAX_HISTORY)]
    max_history: usize,

    /// Hours a session may stay idle before its transcript is dropped
    #[arg(long, env = "SESSION_LIFETIME", default_value_t = DEFAULT_SESSION_LIFETIME_SECS / 3600)]
    session_lifetime: u64,

    /// Enable per-client rate limiting (server mode)
    #[arg(long, env = "RATE_LIMIT", default_value_t = true, action = ArgAction::Set)]
    rate_limit: bool,

    /// Requests per client per minute
    #[arg(long, env = "MAX_REQUESTS", default_value_t = DEFAULT_MAX_REQUESTS_PER_MINUTE)]
    max_requests: usize,

    /// Log level when RUST_LOG is not set
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Args {
    fn config(&self) -> ChatConfig {
        ChatConfig {
            classifier: ClassifierConfig {
                min_confidence: self.min_confidence,
                max_input_length: self.max_input_length,
                ..ClassifierConfig::default()
            },
            max_history: self.max_history,
            session_lifetime_secs: self.session_lifetime.saturating_mul(3600),
            rate_limit_enabled: self.rate_limit,
            max_requests_per_minute: self.max_requests,
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_logging(&args.log_level);

    if let Err(e) = run(&args).await {
        eprintln!("{} {}", "labbot:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run(args: &Args) -> Result<(), LabbotError> {
    let config = args.config();
    config.validate()?;

    let vocabulary = match &args.vocab {
        Some(path) => VocabularyTable::from_json_str(&std::fs::read_to_string(path)?)?,
        None => VocabularyTable::default(),
    };
    let knowledge = KnowledgeBase::load(&args.kb);
    info!(topics = knowledge.len(), categories = vocabulary.len(), "labbot ready");

    let orchestrator = ChatOrchestrator::new(
        &config,
        Arc::new(knowledge),
        Arc::new(vocabulary),
        Arc::new(InMemoryTranscriptStore::with_lifetime(config.session_lifetime())),
    );

    if args.serve {
        print_header("API Server");
        run_server(&args.addr, orchestrator, RateLimiter::from_config(&config)).await
    } else if let Some(ref text) = args.text {
        let reply = orchestrator.handle("cli", text);
        print_reply(&reply, args);
        Ok(())
    } else {
        // Default to interactive if no mode specified
        run_interactive(&orchestrator, args)
    }
}

/// Chat on stdin until EOF or quit/exit
fn run_interactive(orchestrator: &ChatOrchestrator, args: &Args) -> Result<(), LabbotError> {
    print_header("Interactive");
    println!("Tanya tentang jam buka, aturan, atau spesifikasi PC. Ketik 'quit' untuk keluar.");
    println!();

    let session_id = Uuid::new_v4().to_string();
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut exchanges = 0usize;

    loop {
        print!("{} ", ">".cyan().bold());
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            break;
        }
        if line.is_empty() {
            continue;
        }

        let reply = orchestrator.handle(&session_id, line);
        print_reply(&reply, args);
        exchanges += 1;
    }

    println!("\nSession ended. Exchanges: {}", exchanges);
    Ok(())
}

fn print_reply(reply: &ChatReply, args: &Args) {
    if args.json {
        match serde_json::to_string(reply) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("failed to encode reply: {}", e),
        }
    } else if args.verbose {
        println!("{}", reply.to_parseable_string());
    } else {
        println!("{}", reply.to_terminal_string());
    }
}

fn print_header(mode: &str) {
    println!("{}", "========================================".bold());
    println!("{}", format!("  labbot v{} - {}", VERSION, mode).bold());
    println!("{}", "========================================".bold());
    println!();
}
