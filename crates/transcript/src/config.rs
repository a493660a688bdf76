use transcript_core::{LayoutMode, ParserConfig};

use crate::prelude::{eprintln, *};

/// Parser overrides shared by every command that parses.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ParserArgs {
    /// Column interpretation: auto, split or single
    #[arg(long)]
    pub layout: Option<LayoutMode>,

    /// Vertical bucket size used to group tokens into rows
    #[arg(long)]
    pub row_bucket: Option<f32>,
}

#[derive(Debug, clap::Args)]
pub struct ConfigOptions {
    #[command(flatten)]
    pub parser: ParserArgs,
}

/// Defaults, then the `--config` file, then command-line flags.
pub fn effective_config(global: &crate::Global, args: &ParserArgs) -> Result<ParserConfig, Error> {
    let mut config = match &global.config {
        Some(path) => ParserConfig::load(path)?,
        None => ParserConfig::default(),
    };
    if let Some(layout) = args.layout {
        config.layout = layout;
    }
    if let Some(row_bucket) = args.row_bucket {
        config.row_bucket = row_bucket;
    }
    config.validate()?;
    Ok(config)
}

pub fn run(options: ConfigOptions, global: crate::Global) -> Result<()> {
    let config = effective_config(&global, &options.parser)?;
    if global.verbose {
        match &global.config {
            Some(path) => eprintln!("# loaded from {}", path.display()),
            None => eprintln!("# built-in defaults"),
        }
    }
    anstream::print!(
        "{}",
        config
            .to_toml_string()
            .wrap_err("Failed to render configuration")?
    );
    Ok(())
}
