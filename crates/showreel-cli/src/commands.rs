//! CLI command implementations

use crate::output::{to_json, CatalogRow, OutputFormat};
use crate::sim::RenderSim;
use anyhow::bail;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use showreel_core::{
    Catalog, PlaybackPhase, PlayerConfig, PlayerSession, RenderEvent, ViewState,
};
use std::time::Duration;
use tabled::{settings::Style, Table};
use url::Url;

/// Print the sample catalog
pub fn list(format: &str) -> anyhow::Result<()> {
    let catalog = Catalog::sample();

    match OutputFormat::from(format) {
        OutputFormat::Json => {
            println!("{}", to_json(&catalog.items())?);
        }
        OutputFormat::Table => {
            let rows: Vec<CatalogRow> = catalog
                .items()
                .iter()
                .enumerate()
                .map(|(index, item)| CatalogRow {
                    index,
                    id: item.id.clone(),
                    title: item.title.clone(),
                    duration: item.duration_label.clone(),
                    url: item.url.to_string(),
                })
                .collect();
            println!("{}", Table::new(rows).with(Style::rounded()));
            println!("{} items", catalog.len());
        }
        OutputFormat::Text => {
            for item in catalog.items() {
                println!(
                    "{}  {} ({})",
                    style(&item.id).cyan(),
                    item.title,
                    item.duration_label
                );
                println!("    {}", style(&item.description).dim());
            }
            println!("\n{} items", catalog.len());
        }
    }

    Ok(())
}

/// Play a catalog item or custom URL headlessly against the simulated
/// render component
pub async fn play(
    item: &str,
    speed: f64,
    seek: Option<f64>,
    start_paused: bool,
) -> anyhow::Result<()> {
    if !speed.is_finite() || speed <= 0.0 {
        bail!("speed must be a positive number");
    }

    let catalog = Catalog::sample();
    let mut sim = RenderSim::for_catalog(&catalog);
    let mut session = PlayerSession::new(
        catalog.clone(),
        sim.renderer(),
        PlayerConfig {
            autoplay: !start_paused,
        },
    );

    if catalog.find(item).is_some() {
        session.select_item(item)?;
    } else if Url::parse(item).is_ok() {
        session.select_custom_url(item)?;
    } else {
        bail!("'{item}' is neither a catalog id nor a URL (see `showreel list`)");
    }

    let title = session
        .state()
        .item
        .as_ref()
        .map(|i| i.title.clone())
        .unwrap_or_else(|| item.to_string());
    println!("Playing: {}", style(&title).bold());

    let mut bar: Option<ProgressBar> = None;
    let mut resumed = !start_paused;
    let mut seek_pending = seek;
    let mut finished = false;

    // One media second per tick; wall-clock pace set by --speed.
    let tick = 1.0;
    for _ in 0..7200 {
        let events = sim.tick(tick);
        let saw_end = events.iter().any(|e| matches!(e, RenderEvent::Ended));
        if let Some(token) = session.active_token() {
            for event in events {
                session.handle_event(token, event);
            }
        }

        let view = session.snapshot();

        if view.phase == PlaybackPhase::Errored {
            if let Some(bar) = bar.take() {
                bar.abandon();
            }
            bail!(
                "playback failed: {}",
                view.last_error.unwrap_or_else(|| "unknown error".into())
            );
        }

        if bar.is_none() {
            if let Some(duration) = view.duration {
                let created = ProgressBar::new(duration.ceil() as u64);
                created.set_style(
                    ProgressStyle::with_template("{prefix:.bold} [{wide_bar}] {pos}/{len}s")?
                        .progress_chars("=>-"),
                );
                created.set_prefix(title.clone());
                bar = Some(created);
            }
        }

        if saw_end {
            if let Some(bar) = bar.take() {
                let length = bar.length().unwrap_or(0);
                bar.set_position(length);
                bar.finish();
            }
            finished = true;
            break;
        }

        if let Some(bar) = &bar {
            bar.set_position(view.position.round() as u64);
        }

        // started paused: demonstrate an explicit resume
        if !resumed && view.phase == PlaybackPhase::Paused {
            println!("{}", style("Started paused; resuming").dim());
            session.toggle_pause()?;
            resumed = true;
        }

        // one-shot mid-play seek
        if let (Some(target), true) = (seek_pending, view.phase == PlaybackPhase::Playing) {
            if view.position >= 1.0 {
                session.begin_seek(target);
                session.commit_seek(target);
                seek_pending = None;
            }
        }

        tokio::time::sleep(Duration::from_secs_f64(tick / speed)).await;
    }

    if !finished {
        bail!("playback did not finish");
    }

    println!("{} {}", style("Finished:").green().bold(), title);
    Ok(())
}

/// Scripted end-to-end exercise of the session controller
pub fn walkthrough() -> anyhow::Result<()> {
    let catalog = Catalog::sample();
    let mut sim = RenderSim::for_catalog(&catalog);
    let mut session = PlayerSession::new(catalog, sim.renderer(), PlayerConfig::default());

    fn pump(sim: &mut RenderSim, session: &mut PlayerSession, dt: f64) {
        for event in sim.tick(dt) {
            if let Some(token) = session.active_token() {
                session.handle_event(token, event);
            }
        }
    }

    fn step(label: &str, view: &ViewState) {
        println!(
            "{} {} {}",
            style(">").cyan().bold(),
            style(label).bold(),
            style(format!(
                "[phase={} pos={:.0}s fullscreen={}]",
                view.phase, view.position, view.fullscreen
            ))
            .dim()
        );
    }

    fn expect_phase(session: &PlayerSession, expected: PlaybackPhase) -> anyhow::Result<()> {
        if session.phase() != expected {
            bail!("expected phase {expected}, found {}", session.phase());
        }
        Ok(())
    }

    // Select the first catalog entry; metadata arrives on the next tick
    session.select_item("big-buck-bunny")?;
    expect_phase(&session, PlaybackPhase::Loading)?;
    pump(&mut sim, &mut session, 0.0);
    expect_phase(&session, PlaybackPhase::Playing)?;
    step("select big-buck-bunny", &session.snapshot());

    // A few progress ticks
    for _ in 0..3 {
        pump(&mut sim, &mut session, 1.0);
    }
    if session.state().position < 1.0 {
        bail!("expected progress after three ticks");
    }
    step("progress", &session.snapshot());

    // Pause holds the transport still
    session.toggle_pause()?;
    expect_phase(&session, PlaybackPhase::Paused)?;
    let held = session.state().position;
    pump(&mut sim, &mut session, 1.0);
    if session.state().position != held {
        bail!("position moved while paused");
    }
    step("pause", &session.snapshot());

    session.toggle_pause()?;
    expect_phase(&session, PlaybackPhase::Playing)?;
    step("resume", &session.snapshot());

    // Two-phase seek
    session.begin_seek(30.0);
    session.commit_seek(30.0);
    pump(&mut sim, &mut session, 1.0);
    if session.state().position < 30.0 {
        bail!("seek did not take effect");
    }
    step("seek to 30s", &session.snapshot());

    // Fullscreen is independent of transport
    session.toggle_fullscreen();
    if !session.state().fullscreen {
        bail!("fullscreen toggle had no effect");
    }
    step("fullscreen", &session.snapshot());

    // Next catalog entry
    session.select_next()?;
    pump(&mut sim, &mut session, 0.0);
    expect_phase(&session, PlaybackPhase::Playing)?;
    if session.state().item.as_ref().map(|i| i.id.as_str()) != Some("elephants-dream") {
        bail!("expected the second catalog entry after next");
    }
    step("next", &session.snapshot());

    // A failing load enters the error state...
    sim.fail_next_load("simulated decode failure");
    session.select_next()?;
    pump(&mut sim, &mut session, 0.0);
    expect_phase(&session, PlaybackPhase::Errored)?;
    step("simulated failure", &session.snapshot());

    // ...and selecting again recovers
    session.select_previous()?;
    pump(&mut sim, &mut session, 0.0);
    expect_phase(&session, PlaybackPhase::Playing)?;
    step("recover via previous", &session.snapshot());

    session.close_session()?;
    expect_phase(&session, PlaybackPhase::Idle)?;
    step("close", &session.snapshot());

    println!("\n{}", style("Walkthrough complete").green().bold());
    Ok(())
}
