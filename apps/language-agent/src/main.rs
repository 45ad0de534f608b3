//! Language Switcher Agent
//!
//! Hosts one voice session with the language-switch tools attached:
//! Session entry → announcement → tool calls → recognizer/synthesizer updates → greeting

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use clap::Parser;
use std::io::{self, Write};
use std::sync::Arc;
use tracing::{error, info, warn};

use intent_bindings::{create_router, init as init_intent_bindings, ToolCall, ToolRouter};
use language_switch::{
    init as init_language_switch, AgentConfig, Announcement, LanguageRegistry,
    LanguageSwitchController,
};
use voice_local::plugin::{
    new_recognizer_backend, new_synthesizer_backend, RecognizerBackendKind,
    SynthesizerBackendKind,
};
use voice_local::{init as init_voice_local, SpeechOutput};

#[derive(Parser)]
#[command(name = "language-agent")]
#[command(about = "Voice assistant that switches its spoken language on request")]
struct Args {
    /// Recognizer backend: mock, deepgram or none
    #[arg(long, default_value = "mock")]
    recognizer: String,

    /// Synthesizer backend: mock, elevenlabs or none
    #[arg(long, default_value = "mock")]
    synthesizer: String,

    /// Tool call to run, by name or as a JSON object (repeatable)
    #[arg(long = "call")]
    calls: Vec<String>,

    /// Interactive mode (read tool calls from stdin)
    #[arg(long)]
    interactive: bool,

    /// Print the agent instructions and tool definitions as JSON and exit
    #[arg(long)]
    list_tools: bool,
}

/// Output channel that prints what the agent would say.
struct ConsoleOutput;

#[async_trait]
impl SpeechOutput for ConsoleOutput {
    async fn say(&self, text: &str) -> voice_local::Result<()> {
        let mut stdout = io::stdout();
        writeln!(stdout, "🔊 {}", text)
            .and_then(|_| stdout.flush())
            .map_err(|e| voice_local::VoiceError::Output(e.to_string()))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_tracing();

    let args = Args::parse();

    init_voice_local().map_err(|e| anyhow!("Failed to init voice backends: {}", e))?;
    init_language_switch().map_err(|e| anyhow!("Failed to init language switch: {}", e))?;
    init_intent_bindings().map_err(|e| anyhow!("Failed to init intent bindings: {}", e))?;

    let config = AgentConfig::default();
    let registry = Arc::new(LanguageRegistry::builtin());

    let mut controller = LanguageSwitchController::new(
        registry.clone(),
        Arc::new(ConsoleOutput),
        config.default_language,
    );

    match args.recognizer.as_str() {
        "none" => info!("Running without a recognizer"),
        name => {
            let kind = match name {
                "mock" => RecognizerBackendKind::Mock,
                "deepgram" => RecognizerBackendKind::Deepgram,
                _ => {
                    error!("Unknown recognizer backend: {}", name);
                    return Err(anyhow!("Unknown recognizer backend"));
                }
            };
            let recognizer = new_recognizer_backend(kind, config.recognizer_config(&registry))?;
            info!("Recognizer: {} ({})", name, config.stt_model);
            controller = controller.with_recognizer(recognizer);
        }
    }

    match args.synthesizer.as_str() {
        "none" => info!("Running without a synthesizer"),
        name => {
            let kind = match name {
                "mock" => SynthesizerBackendKind::Mock,
                "elevenlabs" => SynthesizerBackendKind::ElevenLabs,
                _ => {
                    error!("Unknown synthesizer backend: {}", name);
                    return Err(anyhow!("Unknown synthesizer backend"));
                }
            };
            let synthesizer =
                new_synthesizer_backend(kind, config.synthesizer_config(&registry))?;
            info!("Synthesizer: {} ({})", name, config.tts_model);
            controller = controller.with_synthesizer(synthesizer);
        }
    }

    let controller = Arc::new(controller);
    let router = create_router(&controller);

    if args.list_tools {
        let listing = serde_json::json!({
            "model": config.llm_model,
            "instructions": config.instructions,
            "tools": router.definitions(),
        });
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    info!("Starting language switcher session");
    if let Some(Announcement::Failed(reason)) = controller.on_enter().await {
        warn!("Capability announcement was not spoken: {}", reason);
    }

    if !args.calls.is_empty() {
        for call in &args.calls {
            run_call(&router, call).await;
        }
    } else if args.interactive {
        run_interactive(&router).await?;
    } else {
        run_demo_calls(&router).await;
    }

    let state = controller.state().await;
    info!(
        session_id = %state.id(),
        started_at = %state.started_at(),
        language = %state.current_language(),
        switches = state.history().len(),
        "Session finished"
    );
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}

fn parse_call(input: &str) -> Result<ToolCall> {
    let input = input.trim();
    if input.starts_with('{') {
        Ok(serde_json::from_str(input)?)
    } else {
        Ok(ToolCall::new(input))
    }
}

async fn run_call(router: &ToolRouter, input: &str) {
    let call = match parse_call(input) {
        Ok(call) => call,
        Err(e) => {
            warn!("Could not parse tool call '{}': {}", input, e);
            return;
        }
    };
    match router.dispatch(&call).await {
        Ok(result) => println!("✅ {} -> {}", call.name, result),
        Err(e) => println!("❌ {}", e),
    }
}

async fn run_interactive(router: &ToolRouter) -> Result<()> {
    println!("Available tools: {}", router.names().join(", "));
    println!("Type a tool name or a JSON tool call and press Enter (or 'quit' to exit):");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("🎤 Call: ");
        stdout.flush()?;

        let mut input = String::new();
        if stdin.read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("exit") {
            break;
        }
        if !input.is_empty() {
            run_call(router, input).await;
        }
    }

    Ok(())
}

async fn run_demo_calls(router: &ToolRouter) {
    let demo_calls = [
        "switch_to_spanish",
        "switch_to_spanish",
        "switch_to_french",
        "switch_to_tamil",
        "switch_to_english",
    ];

    for (i, call) in demo_calls.iter().enumerate() {
        println!("{}/{}: {}", i + 1, demo_calls.len(), call);
        run_call(router, call).await;
    }
}

fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
