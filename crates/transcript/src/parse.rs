use transcript_core::{Transcript, TranscriptParser};

use crate::config::{effective_config, ParserArgs};
use crate::input::{load_document, InputArgs};
use crate::prelude::{eprintln, println, *};

#[derive(Debug, clap::Args)]
pub struct ParseOptions {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub parser: ParserArgs,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Print the transcript as JSON, or `{"error": ...}` and exit with status 1.
pub fn run(options: ParseOptions, global: crate::Global) -> Result<()> {
    match parse_data(&options, &global) {
        Ok(transcript) => {
            if global.verbose {
                eprintln!(
                    "{} term(s), {} course(s)",
                    transcript.terms.len(),
                    transcript.course_count()
                );
            }
            println!("{}", render(&transcript, options.pretty)?);
            Ok(())
        }
        Err(err) => {
            log::error!("{}", err);
            println!("{}", error_json(&err));
            std::process::exit(1);
        }
    }
}

/// Load the input and run the parser over it.
pub fn parse_data(options: &ParseOptions, global: &crate::Global) -> Result<Transcript, Error> {
    let config = effective_config(global, &options.parser)?;
    let parser = TranscriptParser::new(config)?;
    let doc = load_document(&options.input)?;
    Ok(parser.parse(&doc))
}

fn render(transcript: &Transcript, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(transcript)
    } else {
        serde_json::to_string(transcript)
    };
    json.map_err(|e| eyre!("JSON serialization failed: {}", e))
}

fn error_json(err: &Error) -> serde_json::Value {
    serde_json::json!({ "error": err.to_string() })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::input::InputFormat;

    fn options(path: std::path::PathBuf) -> ParseOptions {
        ParseOptions {
            input: InputArgs {
                path,
                format: InputFormat::Auto,
            },
            parser: ParserArgs::default(),
            pretty: false,
        }
    }

    fn global() -> crate::Global {
        crate::Global {
            config: None,
            verbose: false,
        }
    }

    #[test]
    fn test_parse_token_dump() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        let dump = serde_json::json!({
            "pages": [{
                "width": 612.0,
                "tokens": [
                    {"text": "Fall", "x": 20.0, "y": 100.0},
                    {"text": "2021", "x": 50.0, "y": 100.0},
                    {"text": "MATH", "x": 20.0, "y": 120.0},
                    {"text": "151", "x": 60.0, "y": 120.0},
                    {"text": "Calculus", "x": 90.0, "y": 120.0},
                    {"text": "4.000", "x": 200.0, "y": 120.0},
                    {"text": "A", "x": 240.0, "y": 120.0}
                ]
            }]
        });
        write!(file, "{}", dump).unwrap();

        let transcript = parse_data(&options(file.path().to_path_buf()), &global()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&render(&transcript, false).unwrap()).unwrap();
        assert_eq!(json["terms"][0]["label"], "Fall 2021");
        assert_eq!(json["terms"][0]["status"], "Evaluated");
        assert_eq!(json["terms"][0]["courses"][0]["code"], "MATH 151");
        assert_eq!(json["terms"][0]["courses"][0]["credits"], 4.0);
    }

    #[test]
    fn test_malformed_dump_is_an_error() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{{\"pages\": 3}}").unwrap();
        let err = parse_data(&options(file.path().to_path_buf()), &global()).unwrap_err();
        assert!(matches!(err, Error::Core(_)));
        let json = error_json(&err);
        assert!(json["error"].as_str().unwrap().contains("token dump"));
    }
}
