use clap::Args;
use confbot_core::{EventCard, NavButton, QueryEngine};
use serde::Serialize;

use super::{CliResult, Context};

#[derive(Args)]
pub struct SearchArgs {
    /// Free text; blank lists upcoming events
    #[arg(default_value = "")]
    pub query: String,
    /// Reference time, e.g. 2019-05-03T10:15 (defaults to now)
    #[arg(long)]
    pub at: Option<String>,
    /// Maximum results (defaults to search.inline_limit)
    #[arg(long)]
    pub limit: Option<usize>,
    /// Print JSON instead of plain text
    #[arg(long)]
    pub json: bool,
}

/// One inline query result as the transport would send it.
#[derive(Serialize)]
struct InlineResult {
    id: usize,
    #[serde(flatten)]
    card: EventCard,
    button: NavButton,
}

pub fn run(ctx: &Context, args: &SearchArgs) -> CliResult {
    let schedule = ctx.load_schedule()?;
    let at = ctx.search_reference(args.at.as_deref())?;
    let limit = args.limit.unwrap_or(ctx.config.search.inline_limit);
    let formatter = ctx.config.formatter();
    let navigator = ctx.config.navigator()?;

    let mut search = QueryEngine::new(&schedule).search(&args.query, at);
    let results: Vec<InlineResult> = search
        .by_ref()
        .take(limit)
        .enumerate()
        .map(|(id, event)| InlineResult {
            id,
            card: formatter.event_card(event),
            button: navigator.parallel_events_button(event),
        })
        .collect();
    tracing::debug!(
        query = %args.query,
        results = results.len(),
        fell_back = search.fell_back(),
        "inline search"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    for result in &results {
        println!("{}. {}", result.id + 1, result.card.title);
        for line in result.card.description.lines() {
            println!("   {line}");
        }
        println!("   [{}] {}", result.button.label, result.button.token);
    }
    Ok(())
}
