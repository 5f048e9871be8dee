// Command-line interface for mdattr
//
// This binary converts between markdown and styled text (dumped as JSON), and
// offers two developer tools on top of the markdown parser:
//
// Converting:
//
// The conversion needs a to and from pair. The from can be auto-detected from the file extension, while being overwrittable by an explicit --from flag.
// Usage:
//  mdattr <input> --to <format> [--from <format>] [--output <file>]  - Convert between formats (default)
//  mdattr convert <input> --to <format> [--from <format>] [--output <file>]  - Same as above (explicit)
//  mdattr inspect <path> [<transform>]      - Show the parsed runs (defaults to "runs")
//  mdattr roundtrip <path>                  - Check that parse + serialize reproduces the file
//  mdattr --list-transforms                 - List available transforms
//
// Extra Parameters:
//
// Settings can be overridden using --extra-<parameter-name> <value>. Known keys update the loaded
// configuration, anything else is passed through to the target format.
// Example:
//  mdattr notes.md --to markdown --extra-bullet -

use mdattr_cli::transforms;

use clap::{Arg, ArgAction, Command, ValueHint};
use mdattr::formats::json::{JsonFormat, JsonOptions};
use mdattr::formats::markdown::{BulletStyle, MarkdownFormat, MarkdownParser, ParserOptions};
use mdattr::{Format, FormatRegistry, SerializerOptions};
use mdattr_config::{Loader, MdattrConfig};
use std::collections::HashMap;
use std::fs;
use url::Url;

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
/// - `--extras-<key>` (alias for `--extra-<key>`)
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        let key_opt = arg
            .strip_prefix("--extra-")
            .or_else(|| arg.strip_prefix("--extras-"));

        if let Some(key) = key_opt {
            // A lone "-" is a value (the dash bullet), not a flag
            let has_value = args
                .get(i + 1)
                .is_some_and(|next| next == "-" || !next.starts_with('-'));

            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn build_cli() -> Command {
    Command::new("mdattr")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert between markdown and styled text")
        .long_about(
            "mdattr turns a markdown subset into styled text (text plus attribute runs) and back.\n\n\
            Commands:\n  \
            - convert:   Transform between formats (markdown, json)\n  \
            - inspect:   View the styled text a markdown file parses to\n  \
            - roundtrip: Check that parse + serialize reproduces a file\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to override settings.\n  \
            Boolean flags can omit the value (defaults to 'true').\n  \
            Known keys: bullet, pretty, autolink, base-url\n\n\
            Examples:\n  \
            mdattr notes.md --to json                 # Dump styled text as JSON (stdout)\n  \
            mdattr notes.json --to markdown -o out.md # Write markdown to a file\n  \
            mdattr inspect notes.md                   # List attribute runs\n  \
            mdattr roundtrip notes.md                 # Exit 1 if the file does not survive",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-transforms")
                .long("list-transforms")
                .help("List available transforms")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a mdattr.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("inspect")
                .about("Inspect the styled text parsed from a markdown file")
                .long_about(
                    "View the styled text a markdown file parses to.\n\n\
                    Transforms:\n  \
                    - runs: One line per attribute run (default)\n  \
                    - text: The bare string, list and quote markers included\n  \
                    - json: Text plus runs as JSON\n\n\
                    Examples:\n  \
                    mdattr inspect notes.md                       # Run listing\n  \
                    mdattr inspect notes.md json --extra-pretty false",
                )
                .arg(
                    Arg::new("path")
                        .help("Path to the markdown file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("transform")
                        .help("Transform to apply. Defaults to 'runs'")
                        .required(false)
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            transforms::AVAILABLE_TRANSFORMS,
                        ))
                        .index(2)
                        .value_hint(ValueHint::Other),
                ),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between document formats (default command)")
                .long_about(
                    "Convert documents between different formats.\n\n\
                    Supported formats:\n  \
                    - markdown: Markdown subset (.md, .markdown)\n  \
                    - json:     Styled text as JSON (.json)\n\n\
                    The source format is auto-detected from the file extension.\n\
                    Output goes to stdout by default, or use -o to specify a file.\n\n\
                    Examples:\n  \
                    mdattr convert notes.md --to json            # Markdown to JSON (stdout)\n  \
                    mdattr convert notes.json --to markdown -o out.md\n  \
                    mdattr notes.md --to json                    # 'convert' is optional",
                )
                .arg(
                    Arg::new("input")
                        .help("Input file path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Source format (auto-detected from file extension if not specified)")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (required)")
                        .required(true)
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("roundtrip")
                .about("Check that a markdown file survives parse and serialize unchanged")
                .long_about(
                    "Parse a markdown file and serialize it again with the configured options.\n\n\
                    Exits 0 when the output equals the input. Otherwise reports the first\n\
                    differing line on stderr and exits 1.",
                )
                .arg(
                    Arg::new("path")
                        .help("Path to the markdown file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                ),
        )
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Try to parse args. If no subcommand is provided, inject "convert"
    let args: Vec<String> = std::env::args().collect();

    let (cleaned_args, mut extra_params) = parse_extra_args(&args);

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            if cleaned_args.len() > 1
                && !cleaned_args[1].starts_with('-')
                && !["inspect", "convert", "roundtrip", "help"].contains(&cleaned_args[1].as_str())
            {
                let mut new_args = vec![cleaned_args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&cleaned_args[1..]);

                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    if matches.get_flag("list-transforms") {
        handle_list_transforms_command();
        return;
    }

    let mut config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    apply_config_overrides(&mut config, &mut extra_params);

    match matches.subcommand() {
        Some(("inspect", sub_matches)) => {
            let path = required_arg(sub_matches, "path");
            let transform = sub_matches
                .get_one::<String>("transform")
                .map(|s| s.as_str())
                .unwrap_or("runs");
            handle_inspect_command(path, transform, &extra_params, &config);
        }
        Some(("convert", sub_matches)) => {
            let input = required_arg(sub_matches, "input");
            let to = required_arg(sub_matches, "to");
            let registry = registry_from_config(&config);

            // Auto-detect --from if not provided
            let from = match sub_matches.get_one::<String>("from") {
                Some(f) => f.to_string(),
                None => match registry.detect_format(input) {
                    Some(detected) => detected.to_string(),
                    None => {
                        eprintln!("Error: Could not detect format from filename '{input}'");
                        eprintln!("Please specify --from explicitly");
                        std::process::exit(1);
                    }
                },
            };

            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_convert_command(&registry, input, &from, to, output, &extra_params);
        }
        Some(("roundtrip", sub_matches)) => {
            let path = required_arg(sub_matches, "path");
            handle_roundtrip_command(path, &config);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn required_arg<'a>(matches: &'a clap::ArgMatches, name: &str) -> &'a str {
    match matches.get_one::<String>(name) {
        Some(value) => value.as_str(),
        None => {
            eprintln!("Error: missing required argument '{name}'");
            std::process::exit(1);
        }
    }
}

fn read_source(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        std::process::exit(1);
    })
}

/// Handle the inspect command
fn handle_inspect_command(
    path: &str,
    transform: &str,
    extra_params: &HashMap<String, String>,
    config: &MdattrConfig,
) {
    let source = read_source(path);
    let parser = MarkdownParser::with_options(&ParserOptions::from(&config.parser));

    let text = parser.parse(&source).unwrap_or_else(|e| {
        eprintln!("Parse error: {e}");
        std::process::exit(1);
    });

    let params = build_inspect_params(config, extra_params);
    let output = transforms::execute_transform(&text, transform, &params).unwrap_or_else(|e| {
        eprintln!("Execution error: {e}");
        std::process::exit(1);
    });

    print!("{output}");
}

/// Handle the convert command
fn handle_convert_command(
    registry: &FormatRegistry,
    input: &str,
    from: &str,
    to: &str,
    output: Option<&str>,
    extra_params: &HashMap<String, String>,
) {
    // Validate formats exist
    if let Err(e) = registry.get(from) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    if let Err(e) = registry.get(to) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let source = read_source(input);

    let text = registry.parse(&source, from).unwrap_or_else(|e| {
        eprintln!("Parse error: {e}");
        std::process::exit(1);
    });
    log::debug!("parsed {} bytes of {from} into {} runs", source.len(), text.runs().count());

    // Serialize (format-specific parameters allowed via --extra-*)
    let result = registry
        .serialize_with_options(&text, to, extra_params)
        .unwrap_or_else(|e| {
            eprintln!("Serialization error: {e}");
            std::process::exit(1);
        });

    match output {
        Some(path) => {
            fs::write(path, result).unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
        }
        None => print!("{result}"),
    }
}

/// Handle the roundtrip command
fn handle_roundtrip_command(path: &str, config: &MdattrConfig) {
    let source = read_source(path);
    let format = MarkdownFormat::with_options(
        &ParserOptions::from(&config.parser),
        SerializerOptions::from(&config.serializer),
    );

    let serialized = format
        .parse(&source)
        .and_then(|text| format.serialize(&text))
        .unwrap_or_else(|e| {
            eprintln!("Round trip failed: {e}");
            std::process::exit(1);
        });

    match transforms::first_difference(&source, &serialized) {
        None => println!("{path}: ok"),
        Some(difference) => {
            eprintln!("{path}: round trip differs at {difference}");
            std::process::exit(1);
        }
    }
}

/// Handle the list-transforms command
fn handle_list_transforms_command() {
    println!("Available transforms (mdattr inspect <path> <transform>):\n");
    println!("  runs        - One line per attribute run (default)");
    println!("  text        - The parsed string");
    println!("  json        - Text plus runs as JSON");

    println!("\nConversion formats:");
    let registry = FormatRegistry::with_defaults();
    for format in registry.iter() {
        println!("  {:<11} - {}", format.name(), format.description());
        if !format.option_names().is_empty() {
            println!("                options: {}", format.option_names().join(", "));
        }
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> MdattrConfig {
    let loader = Loader::new().with_optional_file("mdattr.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

fn registry_from_config(config: &MdattrConfig) -> FormatRegistry {
    let mut registry = FormatRegistry::new();
    registry.register(MarkdownFormat::with_options(
        &ParserOptions::from(&config.parser),
        SerializerOptions::from(&config.serializer),
    ));
    registry.register(JsonFormat::new(JsonOptions::from(&config.convert.json)));
    registry
}

fn apply_config_overrides(config: &mut MdattrConfig, extra_params: &mut HashMap<String, String>) {
    if let Some(raw) = take_override(extra_params, &["bullet"]) {
        config.serializer.bullet = raw.parse::<BulletStyle>().unwrap_or_else(|e| {
            eprintln!("{e}");
            std::process::exit(1);
        });
    }
    if let Some(raw) = take_override(extra_params, &["pretty"]) {
        config.convert.json.pretty = parse_bool_arg("pretty", &raw);
    }
    if let Some(raw) = take_override(extra_params, &["autolink"]) {
        config.parser.autolink = parse_bool_arg("autolink", &raw);
    }
    if let Some(raw) = take_override(extra_params, &["base-url", "base_url"]) {
        let url = Url::parse(&raw).unwrap_or_else(|e| {
            eprintln!("Invalid URL '{raw}' for --extra-base-url: {e}");
            std::process::exit(1);
        });
        config.parser.base_url = Some(url);
    }
}

fn build_inspect_params(
    config: &MdattrConfig,
    overrides: &HashMap<String, String>,
) -> HashMap<String, String> {
    let mut params = HashMap::new();

    params.insert(
        "pretty".to_string(),
        if config.convert.json.pretty {
            "true".to_string()
        } else {
            "false".to_string()
        },
    );

    for (key, value) in overrides {
        params.insert(key.clone(), value.clone());
    }

    params
}

fn take_override(map: &mut HashMap<String, String>, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(value) = map.remove(*key) {
            return Some(value);
        }
    }
    None
}

fn parse_bool_arg(flag: &str, raw: &str) -> bool {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => true,
        "false" | "0" | "no" | "n" => false,
        other => {
            eprintln!("Invalid boolean value '{other}' for --extra-{flag}");
            std::process::exit(1);
        }
    }
}
