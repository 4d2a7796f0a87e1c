use std::path::Path;

use a2ui_kit::a2ui::{A2uiSession, InputFormat, looks_like_protocol};
use anyhow::Result;

use super::render::{print_outlines, surface_ids};
use crate::config::Config;
use crate::input;

pub async fn handle(config: &Config, markdown: &Path, a2ui: &Path) -> Result<()> {
    let markdown_text = input::read_all(Some(markdown)).await?;
    let a2ui_text = input::read_all(Some(a2ui)).await?;

    if looks_like_protocol(&markdown_text) {
        log::warn!("{} contains A2UI messages", markdown.display());
    }
    if !looks_like_protocol(&a2ui_text) {
        log::warn!("{} contains no A2UI messages", a2ui.display());
    }

    let mut session = A2uiSession::with_config(InputFormat::Framed, config.a2ui.clone());
    session.push_chunk(&a2ui_text);
    session.finish();

    println!("=== Standard ({}) ===", markdown.display());
    println!("{}", markdown_text.trim_end());
    println!();
    println!("=== A2UI ({}) ===", a2ui.display());
    print_outlines(&session, &surface_ids(&session, None)?);
    Ok(())
}
