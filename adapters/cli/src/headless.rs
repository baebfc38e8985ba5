//! Window-less mode that scripts a number of presses and prints the results.

use std::{io::Write, time::Duration};

use anyhow::Result;
use chaos_summoner_core::{Event, IntensityLevel};
use chaos_summoner_rendering::{format_session_clock, format_thousands, FrameInput};
use chaos_summoner_world::query;
use tracing::debug;

use crate::simulation::Simulation;

/// Simulated time between two scripted presses.
const PRESS_INTERVAL: Duration = Duration::from_millis(500);

/// Presses the summon button `presses` times, writing one line per summon
/// followed by the dashboard and the recent events list.
pub(crate) fn run<W>(simulation: &mut Simulation, presses: u32, out: &mut W) -> Result<()>
where
    W: Write,
{
    writeln!(out, "{}", query::welcome_banner(simulation.world()))?;

    let press = FrameInput {
        summon: true,
        ..FrameInput::default()
    };
    for _ in 0..presses {
        let report = simulation.step(PRESS_INTERVAL, press);
        for event in &report.events {
            match event {
                Event::ChaosSummoned {
                    event,
                    intensity,
                    total_summons,
                } => {
                    writeln!(
                        out,
                        "summon #{total_summons} [{}] {}: {} (level {})",
                        event.tier.label(),
                        event.location,
                        event.message,
                        intensity.get()
                    )?;
                }
                Event::ActivityDrifted {
                    active_users,
                    global_score,
                } => debug!(active_users, global_score, "activity drifted"),
                Event::ChaosEventEvicted { id } => debug!(id = id.get(), "event evicted"),
                _ => {}
            }
        }
    }

    let world = simulation.world();
    let counters = query::counters(world);
    writeln!(
        out,
        "level {}/{} | summons {} | global score {} | active summoners {}",
        counters.intensity.get(),
        IntensityLevel::MAX.get(),
        counters.total_summons,
        format_thousands(counters.global_score),
        format_thousands(counters.active_users)
    )?;
    writeln!(out, "recent chaos events (newest first):")?;
    for event in query::recent_events(world) {
        writeln!(
            out,
            "  {} [{}] {}: {}",
            format_session_clock(event.created_at),
            event.tier.label(),
            event.location,
            event.message
        )?;
    }
    Ok(())
}
