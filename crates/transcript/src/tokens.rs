use crate::input::{load_document, InputArgs};
use crate::prelude::{eprintln, println, *};

#[derive(Debug, clap::Args)]
pub struct TokensOptions {
    #[command(flatten)]
    pub input: InputArgs,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Print the input as a token dump that `parse --format tokens` accepts.
pub fn run(options: TokensOptions, global: crate::Global) -> Result<()> {
    let doc = load_document(&options.input)?;
    if global.verbose {
        let words: usize = doc.pages.iter().map(|p| p.tokens.len()).sum();
        eprintln!("{} page(s), {} token(s)", doc.pages.len(), words);
    }
    let json = if options.pretty {
        serde_json::to_string_pretty(&doc)?
    } else {
        serde_json::to_string(&doc)?
    };
    println!("{}", json);
    Ok(())
}
