use clap::Args;
use confbot_core::{decode_time, encode_time, EventRecord, SlotTime};
use serde::Serialize;

use super::{CliResult, Context};

#[derive(Args)]
pub struct PageArgs {
    /// Print JSON instead of the rendered page
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct PageOutput<'a> {
    time: SlotTime,
    token: String,
    advanced: bool,
    page: String,
    events: Vec<&'a EventRecord>,
    keyboard: Vec<Vec<confbot_core::NavButton>>,
}

pub fn now(ctx: &Context, at: Option<&str>, args: &PageArgs) -> CliResult {
    let at = ctx.slot_at(at)?;
    show(ctx, at, args)
}

pub fn goto(ctx: &Context, token: &str, args: &PageArgs) -> CliResult {
    let at = decode_time(token)?;
    show(ctx, at, args)
}

fn show(ctx: &Context, at: SlotTime, args: &PageArgs) -> CliResult {
    let schedule = ctx.load_schedule()?;
    let slot = ctx.config.advancer()?.next_nonempty(&schedule, at)?;
    let page = ctx
        .config
        .formatter()
        .current_events_page(slot.time, &slot.events);
    let keyboard = ctx.config.navigator()?.keyboard(slot.time);

    if args.json {
        let output = PageOutput {
            time: slot.time,
            token: encode_time(slot.time),
            advanced: slot.advanced,
            page,
            events: slot.events,
            keyboard,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{page}\n");
    for row in keyboard {
        let buttons: Vec<String> = row
            .iter()
            .map(|b| format!("[{}] {}", b.label, b.token))
            .collect();
        println!("{}", buttons.join("   "));
    }
    Ok(())
}
