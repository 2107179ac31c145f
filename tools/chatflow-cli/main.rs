use chatflow::document::visualizer::visualize_document;
use chatflow::engine::Response;
use chatflow::prelude::*;
use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Write};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Publish, inspect and chat with conversation flows
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log engine decisions at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert an editor JSON file into a runtime document
    Publish {
        /// Path to the editor document (blocks + connections)
        editor_path: String,
        /// Output path; `.json` writes the wire JSON, anything else a binary artifact
        output_path: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        welcome_message: Option<String>,
    },
    /// Run a single message against a runtime document
    Run {
        document_path: String,
        message: String,
        /// Optional engine configuration JSON file
        #[arg(short, long)]
        config: Option<String>,
    },
    /// Start an interactive chat session
    Chat {
        document_path: String,
        #[arg(short, long)]
        config: Option<String>,
    },
    /// Print an overview of a runtime document
    Show { document_path: String },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Publish {
            editor_path,
            output_path,
            name,
            welcome_message,
        } => run_publish(&editor_path, &output_path, name, welcome_message),
        Command::Run {
            document_path,
            message,
            config,
        } => run_single(&document_path, &message, config.as_deref()),
        Command::Chat {
            document_path,
            config,
        } => run_chat(&document_path, config.as_deref()),
        Command::Show { document_path } => {
            let document = load_document(&document_path);
            println!("{}", visualize_document(&document));
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_publish(
    editor_path: &str,
    output_path: &str,
    name: Option<String>,
    welcome_message: Option<String>,
) {
    let start = Instant::now();
    let editor_json = fs::read_to_string(editor_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read editor file '{}': {}",
            editor_path, e
        ))
    });
    let graph = EditorDocument::from_json(&editor_json)
        .and_then(IntoFlow::into_flow)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load editor graph: {}", e)));

    let mut builder = FlowSerializer::builder(&graph);
    if let Some(name) = &name {
        builder = builder.with_name(name);
    }
    if let Some(welcome_message) = &welcome_message {
        builder = builder.with_welcome_message(welcome_message);
    }
    let document = builder.build().serialize();

    if output_path.ends_with(".json") {
        let json = document
            .to_json()
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to encode document: {}", e)));
        fs::write(output_path, json).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to write '{}': {}", output_path, e))
        });
    } else {
        document
            .save(output_path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to save artifact: {}", e)));
    }

    println!(
        "Published '{}': {} blocks, {} connections -> {} in {:?}",
        document.name,
        document.blocks.len(),
        graph.connections().len(),
        output_path,
        start.elapsed()
    );
}

fn run_single(document_path: &str, message: &str, config_path: Option<&str>) {
    let engine = build_engine(document_path, config_path);
    let start = Instant::now();
    let reply = engine.execute(message);
    let duration = start.elapsed();

    for response in &reply.responses {
        println!("  -> {}", render(response));
    }
    println!("  -> Reason: {}", reply.reason);
    println!("Execution: {:?}", duration);
}

/// Runs an interactive session. A number selects the matching quick reply shown last.
fn run_chat(document_path: &str, config_path: Option<&str>) {
    let engine = build_engine(document_path, config_path);
    let mut session = Session::new();

    println!("--- {} ---", engine.document().name);
    println!("bot: {}", engine.welcome_message());
    println!("(type 'quit' to leave)");

    loop {
        let line = prompt_for_input("you");
        if line.is_empty() {
            continue;
        }
        if line == "quit" || line == "exit" {
            break;
        }

        let action = engine
            .numbered_quick_reply(&session, &line)
            .unwrap_or_else(|| UserAction::message(line));
        let reply = engine.respond(&mut session, action);

        for response in &reply.responses {
            println!("bot: {}", render(response));
            if let Response::Text { quick_replies, .. } = response {
                for (i, quick_reply) in quick_replies.iter().enumerate() {
                    println!("     [{}] {}", i + 1, quick_reply.text);
                }
            }
        }
    }
}

fn build_engine(document_path: &str, config_path: Option<&str>) -> FlowEngine {
    let document = load_document(document_path);
    let config = match config_path {
        Some(path) => {
            let json = fs::read_to_string(path).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to read config '{}': {}", path, e))
            });
            EngineConfig::from_json(&json)
                .unwrap_or_else(|e| exit_with_error(&format!("Invalid config: {}", e)))
        }
        None => EngineConfig::default(),
    };
    FlowEngine::builder(document)
        .with_config(config)
        .build()
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to build engine: {}", e)))
}

fn load_document(path: &str) -> RuntimeDocument {
    RuntimeDocument::load(path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to load document '{}': {}", path, e))
    })
}

fn render(response: &Response) -> String {
    match response {
        Response::Text { content, .. } => content.clone(),
        Response::Media { content } => format!(
            "[{}] {}",
            content.media_type,
            content
                .media_url
                .as_deref()
                .or(content.content.as_deref())
                .or(content.media_name.as_deref())
                .unwrap_or("")
        ),
        Response::Form { content } => format!(
            "[form {}] {} fields",
            content.form_name.as_deref().unwrap_or(&content.form_id),
            content.fields.len()
        ),
        Response::Delay { content } => format!("(typing for {}s)", content),
    }
}

fn prompt_for_input(prompt_text: &str) -> String {
    let mut line = String::new();
    print!("{}: ", prompt_text);
    if io::stdout().flush().is_err() {
        exit_with_error("Failed to flush stdout");
    }
    match io::stdin().read_line(&mut line) {
        Ok(0) => std::process::exit(0),
        Ok(_) => line.trim().to_string(),
        Err(e) => exit_with_error(&format!("Failed to read line: {}", e)),
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
