//! Requirement Visualization CLI Tool
//!
//! A command line tool that parses a code signing requirement and
//! prints it as an ASCII tree, canonical text, a token stream, or JSON.
//!
//! Usage:
//!   csreq-treeviz `<requirement>` [options]
//!   csreq-treeviz --file `<path>` [options]
//!   echo 'anchor apple' | csreq-treeviz
//!
//! Options:
//!   --format `<format>`   Output format: treeviz (default), text, tokens, json
//!   --file `<path>`       Read the requirement from a file instead of an argument

use std::fs;
use std::io::{self, Read, Write};
use std::process::ExitCode;

use clap::{Arg, Command};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use csreq::ast::{render_tree, ParseResult};
use csreq::{parse, tokenize, ParseError};

fn main() -> ExitCode {
    let matches = Command::new("csreq-treeviz")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Code signing requirement visualization tool")
        .arg(
            Arg::new("requirement")
                .help("Requirement text (reads stdin when absent)")
                .required(false)
                .index(1),
        )
        .arg(
            Arg::new("file")
                .long("file")
                .value_name("PATH")
                .help("Read the requirement from a file"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .value_name("FORMAT")
                .help("Output format: treeviz, text, tokens, json")
                .default_value("treeviz"),
        )
        .get_matches();

    let source = match read_source(&matches) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("error: {}", error);
            return ExitCode::FAILURE;
        }
    };

    let format = matches.get_one::<String>("format").unwrap();
    match run(&source, format) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(error) => {
            report_error(&source, &error);
            ExitCode::FAILURE
        }
    }
}

fn read_source(matches: &clap::ArgMatches) -> io::Result<String> {
    if let Some(requirement) = matches.get_one::<String>("requirement") {
        return Ok(requirement.clone());
    }
    if let Some(path) = matches.get_one::<String>("file") {
        return fs::read_to_string(path).map(|s| s.trim_end().to_string());
    }
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer.trim_end().to_string())
}

fn run(source: &str, format: &str) -> Result<String, ParseError> {
    match format {
        "tokens" => {
            let tokens = tokenize(source)?;
            let mut output = String::new();
            for token in &tokens {
                output.push_str(&token.to_string());
                output.push('\n');
            }
            Ok(output)
        }
        "json" => {
            let result = parse(source)?;
            let mut json = serde_json::to_string_pretty(&result)
                .expect("parse results serialize cleanly");
            json.push('\n');
            Ok(json)
        }
        "text" => {
            let result = parse(source)?;
            Ok(format!("{}\n", result.text_form()))
        }
        _ => {
            let result = parse(source)?;
            Ok(match result {
                ParseResult::Requirement(requirement) => render_tree(&requirement),
                ParseResult::RequirementSet(set) => {
                    let mut output = String::new();
                    for (tag, requirement) in &set.requirements {
                        output.push_str(&format!("{} =>\n", tag));
                        output.push_str(&render_tree(requirement));
                    }
                    output
                }
            })
        }
    }
}

/// Print the parse error, with a caret under the failing position for
/// tokenization errors.
fn report_error(source: &str, error: &ParseError) {
    let choice = if atty::is(atty::Stream::Stderr) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stderr = StandardStream::stderr(choice);

    let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
    let _ = write!(stderr, "error: ");
    let _ = stderr.reset();
    let _ = writeln!(stderr, "{}", error);

    if let ParseError::Tokenization(error) = error {
        let _ = writeln!(stderr, "  {}", source);
        let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)));
        let _ = writeln!(stderr, "  {}^", " ".repeat(error.failure_index));
        let _ = stderr.reset();
    }
}
