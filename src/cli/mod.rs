mod args;
mod handlers;

pub use args::{Cli, Commands};

use crate::config::Config;
use anyhow::Result;

pub async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    log::debug!("Loaded config: {:?}", config);

    match cli.command {
        Commands::Render {
            input,
            format,
            surface,
            json,
            watch,
        } => {
            handlers::render::handle(&config, input.as_deref(), format, surface.as_deref(), json, watch)
                .await
        }

        Commands::Detect { input } => handlers::detect::handle(input.as_deref()).await,

        Commands::Compare { markdown, a2ui } => {
            handlers::compare::handle(&config, &markdown, &a2ui).await
        }

        Commands::Prompt { mode } => {
            println!("{}", crate::prompt::system_prompt(mode));
            Ok(())
        }
    }
}
