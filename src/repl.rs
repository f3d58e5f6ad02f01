use anyhow::Result;
use chrono::Utc;
use rustyline::error::ReadlineError;
use rustyline::{Config as RlConfig, DefaultEditor};
use std::sync::Arc;
use therapy_analytics::{ReportGenerator, StatsView};
use therapy_core::config::AppConfig;
use therapy_core::personas::{self, find_persona};
use therapy_core::transport::{self, ChatRequest, ChatTransport, HistoryEntry};

const BANNER: &str = r#"
  ╔═══════════════════════════════════════════╗
  ║          therapy-shell v0.1.0             ║
  ║   Art-therapy practice conversations      ║
  ╚═══════════════════════════════════════════╝

  Type a message and press Enter to talk to the child persona.
  Commands:
    /persona <id>  — Switch persona (does not end the session)
    /personas      — List personas
    /end           — End the current session
    /stats         — Show session statistics
    /report        — Markdown summary report
    /sessions      — List sessions
    /help          — Show this help
    /exit          — Quit
"#;

/// Chat state for one REPL run.
struct ReplState {
    view: StatsView,
    persona: String,
    history_limit: usize,
}

/// Run the interactive REPL.
pub async fn run(config: AppConfig, persona: String) -> Result<()> {
    if find_persona(&persona).is_none() {
        anyhow::bail!("Unknown persona '{}'. Try one of: aarav, dani, leo", persona);
    }

    println!("{}", BANNER);
    let transport = transport::from_config(&config.transport)?;
    println!("  Transport: {}", transport.name());
    println!();

    let mut state = ReplState {
        view: StatsView::new(),
        persona,
        history_limit: config.transport.history_limit,
    };

    let rl_config = RlConfig::builder().auto_add_history(true).build();
    let history_path = AppConfig::data_dir().join("repl_history.txt");
    let mut rl = DefaultEditor::with_config(rl_config)?;
    let _ = rl.load_history(&history_path);

    loop {
        let prompt = format!("\x1b[1;36m{}\x1b[0m \x1b[1;32m❯\x1b[0m ", state.persona);

        match rl.readline(&prompt) {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }

                if input.starts_with('/') {
                    if !handle_command(input, &mut state) {
                        break;
                    }
                    continue;
                }

                send_message(input, &mut state, &transport).await;
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(e) => {
                eprintln!("Input error: {}", e);
                break;
            }
        }
    }

    if let Some(parent) = history_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let _ = rl.save_history(&history_path);

    Ok(())
}

/// Send one message and record the exchange only if the transport succeeds.
async fn send_message(input: &str, state: &mut ReplState, transport: &Arc<dyn ChatTransport>) {
    let history = state
        .view
        .store()
        .current_session()
        .filter(|s| s.persona == state.persona)
        .map(|s| HistoryEntry::from_session(s, state.history_limit))
        .unwrap_or_default();
    let request = ChatRequest {
        message: input.to_string(),
        persona_id: state.persona.clone(),
        history,
    };
    let sent_at = Utc::now();

    match transport.send(&request).await {
        Ok(reply) => {
            println!("\x1b[1;33m{}\x1b[0m: {}", state.persona, reply.reply_text);
            if let Some(t) = &reply.matched_therapist {
                tracing::debug!("Matched therapist {} ({}%)", t.name, t.match_score);
            }
            if let Err(e) = state.view.record_message(
                &state.persona,
                input,
                Some(&reply.reply_text),
                sent_at,
            ) {
                eprintln!("\x1b[0;31mNot recorded: {}\x1b[0m", e);
            }
        }
        Err(e) => {
            tracing::warn!("Chat transport failed: {}", e);
            eprintln!("\x1b[0;31mError: {}\x1b[0m", e);
        }
    }
}

/// Handle a slash command. Returns `true` to continue the loop, `false` to exit.
fn handle_command(input: &str, state: &mut ReplState) -> bool {
    let (cmd, arg) = match input.split_once(' ') {
        Some((c, a)) => (c, a.trim()),
        None => (input, ""),
    };

    match cmd {
        "/exit" | "/quit" | "/q" => {
            println!("Goodbye!");
            return false;
        }
        "/persona" => match find_persona(arg) {
            Some(p) => {
                state.persona = p.id.to_string();
                println!("Now talking to {} (age {}, {})", p.name, p.age, p.condition);
                if state.view.store().has_open_session() {
                    println!("  The open session continues; use /end to start a new one.");
                }
            }
            None => println!("Usage: /persona <aarav|dani|leo>"),
        },
        "/personas" => {
            for p in personas::personas() {
                let marker = if p.id == state.persona { " ◀" } else { "" };
                println!(
                    "  {} — {}, {} ({}, loves {}){marker}",
                    p.id, p.name, p.age, p.condition, p.preferred_art
                );
            }
        }
        "/end" => {
            let had_session = state.view.store().has_open_session();
            let stats = state.view.close_session();
            if had_session {
                println!("Session ended. {} session(s) so far.", stats.total_sessions);
            } else {
                println!("No open session.");
            }
        }
        "/stats" => print_stats(&state.view),
        "/report" => {
            println!("{}", ReportGenerator::summary_report(state.view.stats()));
            if let Some(session) = state.view.store().current_session() {
                println!("{}", ReportGenerator::session_report(session));
            }
        }
        "/sessions" | "/ls" => {
            let store = state.view.store();
            if store.total_sessions() == 0 {
                println!("  No sessions.");
            }
            for (i, s) in store.all_sessions().enumerate() {
                let marker = if store.current_session().map(|c| c.id == s.id) == Some(true) {
                    " (open)"
                } else {
                    ""
                };
                println!(
                    "  {}. {} {} ({} msgs, started {}){marker}",
                    i + 1,
                    &s.id[..8],
                    s.persona,
                    s.messages.len(),
                    s.start_time.format("%Y-%m-%d %H:%M")
                );
            }
        }
        "/help" | "/?" => println!("{}", BANNER),
        _ => {
            println!(
                "Unknown command: {}. Type /help for available commands.",
                cmd
            );
        }
    }

    true
}

fn print_stats(view: &StatsView) {
    let stats = view.stats();
    println!("  Sessions: {}", stats.total_sessions);
    for m in &stats.art_therapy_types {
        println!("  {:<10} {} mentions", m.modality.as_str(), m.count);
    }
    for child in &stats.children_progress {
        println!(
            "  {:<8} {} session(s), {} positive, progress {}%",
            child.name, child.sessions, child.positive_interactions, child.progress
        );
    }
}
