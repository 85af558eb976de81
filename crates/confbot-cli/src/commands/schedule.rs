use std::path::PathBuf;

use clap::Subcommand;

use super::{CliResult, Context};

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// List all events in schedule order
    List {
        /// Print JSON instead of plain text
        #[arg(long)]
        json: bool,
    },
    /// Validate a snapshot file without using it
    Check {
        /// Snapshot to validate
        path: PathBuf,
    },
}

pub fn run(ctx: &Context, action: ScheduleAction) -> CliResult {
    match action {
        ScheduleAction::List { json } => {
            let schedule = ctx.load_schedule()?;
            if json {
                println!("{}", serde_json::to_string_pretty(schedule.all())?);
                return Ok(());
            }
            let formatter = ctx.config.formatter();
            for day in schedule.days() {
                println!("{}", formatter.day_label(day));
                for event in schedule.events_on(day) {
                    println!(
                        "  {:02}:{:02} {:>4}m  {:<14} {}",
                        event.start_minutes() / 60,
                        event.start_minutes() % 60,
                        event.duration_minutes(),
                        event.track(),
                        event.name()
                    );
                }
            }
        }
        ScheduleAction::Check { path } => {
            let schedule = ctx.load_schedule_from(&path)?;
            println!(
                "ok: {} events over {} days",
                schedule.len(),
                schedule.days().len()
            );
        }
    }
    Ok(())
}
