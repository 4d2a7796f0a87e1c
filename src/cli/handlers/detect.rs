use std::path::Path;

use a2ui_kit::a2ui::looks_like_protocol;
use anyhow::Result;

use crate::input;

pub async fn handle(input_path: Option<&Path>) -> Result<()> {
    let text = input::read_all(input_path).await?;
    println!("{}", detect(&text));
    Ok(())
}

/// `a2ui` when the text carries a protocol message, `markdown` otherwise.
pub fn detect(text: &str) -> &'static str {
    if looks_like_protocol(text) {
        "a2ui"
    } else {
        "markdown"
    }
}
