use std::path::Path;

use a2ui_kit::a2ui::{A2uiSession, InputFormat, SurfaceState, session_events};
use anyhow::{Context, Result};
use futures::{StreamExt, future};
use serde_json::{Map, Value};

use crate::config::Config;
use crate::input;
use crate::outline::{describe_event, render_outline, text_catalog};

pub async fn handle(
    config: &Config,
    input_path: Option<&Path>,
    format: InputFormat,
    surface: Option<&str>,
    json: bool,
    watch: bool,
) -> Result<()> {
    let reader = input::open(input_path).await?;
    let mut session = A2uiSession::with_config(format, config.a2ui.clone());

    let mut read_error = None;
    let interrupted = {
        let chunks = input::chunks(reader, config.chunk_size).scan(&mut read_error, |slot, chunk| {
            future::ready(match chunk {
                Ok(text) => Some(text),
                Err(e) => {
                    **slot = Some(e);
                    None
                }
            })
        });
        let mut events = session_events(&mut session, chunks);

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                event = events.next() => match event {
                    Some(event) => {
                        if watch {
                            println!("{}", describe_event(&event));
                        }
                    }
                    None => break false,
                },
                _ = &mut ctrl_c => break true,
            }
        }
    };

    if let Some(e) = read_error {
        return Err(e).context("failed to read input");
    }
    if interrupted {
        log::warn!("Interrupted, rendering what arrived so far");
    }
    if watch {
        println!();
    }

    let skipped = session.take_skipped();
    if !skipped.is_empty() {
        log::info!("Skipped {} records", skipped.len());
        for reason in &skipped {
            log::debug!("  {}", reason);
        }
    }

    let ids = surface_ids(&session, surface)?;
    if json {
        print_json(&session, &ids)
    } else {
        print_outlines(&session, &ids);
        Ok(())
    }
}

/// Surfaces to print: the requested one, or all in creation order.
pub fn surface_ids(session: &A2uiSession, surface: Option<&str>) -> Result<Vec<String>> {
    let manager = session.manager();
    match surface {
        Some(id) if manager.get_surface(id).is_none() => {
            anyhow::bail!("No surface '{}' in the response", id)
        }
        Some(id) => Ok(vec![id.to_string()]),
        None => Ok(manager.surface_ids().map(str::to_string).collect()),
    }
}

pub fn print_outlines(session: &A2uiSession, ids: &[String]) {
    if ids.is_empty() {
        println!("No A2UI surfaces found.");
        return;
    }

    let catalog = text_catalog();
    for id in ids {
        let state = match session.manager().get_surface(id).map(|s| s.state()) {
            Some(SurfaceState::Ready) => "ready",
            Some(SurfaceState::Accumulating) => "incomplete",
            Some(SurfaceState::Empty) | None => "empty",
        };
        println!("Surface {} ({})", id, state);
        match session.render(id) {
            Some(tree) => print!("{}", render_outline(&tree, &catalog)),
            None => println!("  (no components)"),
        }
        println!();
    }
}

fn print_json(session: &A2uiSession, ids: &[String]) -> Result<()> {
    let mut trees = Map::new();
    for id in ids {
        trees.insert(id.clone(), serde_json::to_value(session.render(id))?);
    }
    println!("{}", serde_json::to_string_pretty(&Value::Object(trees))?);
    Ok(())
}
