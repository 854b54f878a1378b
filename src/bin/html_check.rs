use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Arg, ArgAction, ArgMatches, Command};
use indoc::indoc;
use log::{LevelFilter, debug};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use htmlsafe::utf_scalar::{Utf8Scalars, Utf16LeScalars};
use htmlsafe::{
    Attribute, AttributeName, AttributeValue, Candidate, Element, ElementName, Encoded, Script,
    Text,
};

const KINDS: [&str; 5] = ["element", "attr-name", "attr-value", "text", "script"];

fn command() -> Command {
    Command::new("html_check")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Validate a single HTML fragment and print its escaped form")
        .long_about(indoc!(
            r#"
            Validate a single HTML fragment and print its escaped form.

            KIND selects the validator. Elements print their start tag and end tag on
            separate lines; scripts print the complete `<script>...</script>` element.
            Validation failures are reported on stderr with a non-zero exit status.
        "#
        ))
        .arg(
            Arg::new("kind")
                .required(true)
                .value_name("KIND")
                .value_parser(KINDS)
                .help("What INPUT is validated as."),
        )
        .arg(
            Arg::new("input")
                .required(true)
                .value_name("INPUT")
                .help("The candidate itself, or a path to it with --file."),
        )
        .arg(
            Arg::new("attr")
                .long("attr")
                .short('a')
                .action(ArgAction::Append)
                .value_name("NAME=VALUE")
                .help("Attribute for `element` and `script` (repeatable). `NAME` alone adds a bare attribute."),
        )
        .arg(
            Arg::new("file")
                .long("file")
                .short('f')
                .action(ArgAction::SetTrue)
                .help("Read the candidate from the file at INPUT."),
        )
        .arg(
            Arg::new("utf16le")
                .long("utf16le")
                .action(ArgAction::SetTrue)
                .requires("file")
                .help("Decode the file as UTF-16LE instead of UTF-8."),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .action(ArgAction::Count)
                .help(indoc!(
                    "-v - info, -vv - debug, -vvv - trace.
                     trace output is only available in debug builds, as it is extremely verbose"
                )),
        )
}

fn init_logging(matches: &ArgMatches) {
    let level = match matches.get_count("verbose") {
        0 => return,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if let Err(e) = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Failed to initialize logging: {e}");
    }
}

fn parse_attributes(matches: &ArgMatches) -> Result<Vec<Attribute>> {
    let Some(raw) = matches.get_many::<String>("attr") else {
        return Ok(Vec::new());
    };
    raw.map(|raw_attr| {
        let attribute = match raw_attr.split_once('=') {
            Some((name, value)) => Attribute::parse(name, value),
            None => Attribute::bare(raw_attr.as_str()),
        };
        attribute.with_context(|| format!("invalid attribute `{raw_attr}`"))
    })
    .collect()
}

/// Validate `candidate` as `kind` and return what would be written to a page.
fn check(kind: &str, candidate: impl Candidate, attributes: &[Attribute]) -> Result<Vec<u8>> {
    if !attributes.is_empty() && !matches!(kind, "element" | "script") {
        bail!("--attr only applies to `element` and `script`");
    }

    let mut out = Vec::new();
    match kind {
        "element" => {
            let element = Element::new(&ElementName::new(candidate)?, attributes)?;
            out.extend_from_slice(element.start_tag()?);
            out.push(b'\n');
            out.extend_from_slice(element.end_tag()?);
        }
        "attr-name" => out.extend_from_slice(AttributeName::new(candidate)?.encoded()?),
        "attr-value" => out.extend_from_slice(AttributeValue::new(candidate).encoded()?),
        "text" => out.extend_from_slice(Text::new(candidate).encoded()?),
        "script" => Script::inline(candidate, attributes)?.render_to(&mut out)?,
        other => bail!("unknown kind `{other}`"),
    }
    Ok(out)
}

fn run(matches: &ArgMatches) -> Result<Vec<u8>> {
    let kind = matches
        .get_one::<String>("kind")
        .context("KIND is required")?;
    let input = matches
        .get_one::<String>("input")
        .context("INPUT is required")?;
    let attributes = parse_attributes(matches)?;

    if !matches.get_flag("file") {
        return check(kind, input, &attributes);
    }

    let path = PathBuf::from(input);
    let bytes =
        fs::read(&path).with_context(|| format!("Failed to read input at: {}", path.display()))?;
    debug!("read {} bytes from {}", bytes.len(), path.display());

    if matches.get_flag("utf16le") {
        check(kind, Utf16LeScalars::new(&bytes), &attributes)
    } else {
        check(kind, Utf8Scalars::new(&bytes), &attributes)
    }
}

fn main() -> Result<()> {
    let matches = command().get_matches();
    init_logging(&matches);

    let encoded = run(&matches)?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(&encoded)?;
    stdout.write_all(b"\n")?;
    stdout.flush()?;
    Ok(())
}
