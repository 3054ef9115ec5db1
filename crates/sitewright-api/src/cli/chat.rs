//! Interactive architect conversation followed by a build.
//!
//! Each turn goes through `StudioService::chat`. Once the brief is complete
//! the brief card is shown and the user confirms before the builder runs;
//! declining keeps the conversation going.

use anyhow::{Result, anyhow};
use console::style;
use dialoguer::{Confirm, Input};

use sitewright_infra::storage::FsSiteStore;
use sitewright_types::brief::{Brief, ConversationTurn};
use sitewright_types::site::SessionId;

use crate::cli::{brief_card, spinner};
use crate::state::AppState;

const EXIT_COMMANDS: [&str; 3] = ["/quit", "/exit", "/q"];

fn print_banner(state: &AppState, session_id: &SessionId) {
    println!();
    println!("  {}", style("Sitewright Architect").cyan().bold());
    println!(
        "  {}",
        style("Tell me about the site you want. Paste a reference URL any time.").dim()
    );
    println!();
    println!(
        "  {}  {}",
        style("Model:").bold(),
        style(&state.config.architect_model).dim()
    );
    println!("  {}  {}", style("Session:").bold(), style(session_id).dim());
    println!();
    println!("  {}", style("Type /quit to leave without building").dim());
    println!("  {}", style("---").dim());
    println!();
}

/// Run the architect conversation and, once confirmed, generate the site.
pub async fn run_chat(
    state: &AppState,
    session: Option<String>,
    style_label: Option<String>,
    json: bool,
) -> Result<()> {
    let session_id = match session {
        Some(raw) => SessionId::parse(&raw).map_err(|e| anyhow!(e))?,
        None => SessionId::generate(),
    };

    if !json {
        print_banner(state, &session_id);
    }

    let mut history: Vec<ConversationTurn> = Vec::new();
    let mut brief = Brief::default();

    loop {
        let message = Input::<String>::new().with_prompt("You").interact_text()?;
        if EXIT_COMMANDS.contains(&message.trim()) {
            return Ok(());
        }

        let thinking = spinner("Thinking...");
        let result = state.studio.chat(&history, &message, &brief).await;
        thinking.finish_and_clear();

        history.push(ConversationTurn::user(message));
        history.push(ConversationTurn::assistant(result.reply.clone()));
        brief = result.brief;

        println!();
        println!("  {} {}", style("Architect:").magenta().bold(), result.reply);
        println!();

        if result.is_complete && confirm_build(&brief)? {
            break;
        }
    }

    let building = spinner("Building your site...");
    let artifact = state
        .studio
        .generate(&brief, style_label.as_deref(), &session_id)
        .await;
    building.finish_and_clear();
    let artifact = artifact?;

    if json {
        println!("{}", serde_json::to_string_pretty(&artifact)?);
        return Ok(());
    }

    println!();
    println!("  {} Site generated!", style("✓").green().bold());
    println!();
    println!("  {}  {}", style("Session:").bold(), style(&artifact.session_id).cyan());
    println!(
        "  {}  {} characters",
        style("Source:").bold(),
        artifact.source_text.len()
    );
    println!(
        "  {}  {}",
        style("Preview:").bold(),
        style(
            FsSiteStore::new(&state.data_dir)
                .preview_path(&artifact.session_id)
                .display()
        )
        .dim()
    );
    println!();
    println!(
        "  Refine it with: {}",
        style(format!("swright edit {} \"...\"", artifact.session_id)).yellow()
    );
    println!();

    Ok(())
}

fn confirm_build(brief: &Brief) -> Result<bool> {
    println!("{}", brief_card::render(brief));
    println!();
    let confirmed = Confirm::new()
        .with_prompt("Build this site?")
        .default(true)
        .interact()?;
    if !confirmed {
        println!("  {}", style("Okay, tell me what to change.").dim());
    }
    Ok(confirmed)
}
