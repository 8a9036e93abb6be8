//! Command-line interface for setlab
//!
//! Usage:
//!   setlab compute -A "1 2 3" -B "2 3 4" --op intersection   - Print the text report
//!   setlab compute --expr "A ∩ (B ∪ C)" -n 3 ... --format csv - Export in another format
//!   setlab regions --project sets.json                        - List Venn regions
//!   setlab diagram --project sets.json                        - Draw the Venn diagram
//!   setlab save --output sets.json -A ... -B ...              - Write a project file
//!   setlab formats                                            - List export formats

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use setlab::setlab::diagram::{buffer_to_text, render_to_buffer, write_colored, Diagram};
use setlab::setlab::elements::format_set;
use setlab::setlab::formats::{FormatError, FormatRegistry};
use setlab::setlab::project::{load_project, save_project, write_atomic};
use setlab::setlab::settings::{Loader, SetlabConfig, LOCAL_CONFIG_FILE};
use setlab::setlab::{Label, OperationChoice, OperationKind, SetCount, SetlabError, Workspace};
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

fn main() {
    let matches = cli().try_get_matches().unwrap_or_else(|e| {
        if !e.use_stderr() {
            e.exit();
        }
        eprintln!("{}", e);
        std::process::exit(1);
    });

    init_logging(matches.get_count("verbose"), matches.get_flag("quiet"));

    if let Err(e) = run(&matches) {
        eprintln!("Error: {}", e);
        if let SetlabError::Format(FormatError::FormatNotFound(_)) = e {
            eprintln!("\nAvailable formats:");
            for format in FormatRegistry::with_defaults().list_formats() {
                eprintln!("  {}", format);
            }
        }
        std::process::exit(1);
    }
}

fn cli() -> Command {
    Command::new("setlab")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Finite-set algebra workbench: compute, diagram and export set operations")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("Configuration file layered over the defaults")
                .value_parser(value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase log output (repeatable)")
                .action(ArgAction::Count)
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only log errors")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .args(input_args())
        .subcommand(
            Command::new("compute")
                .about("Compute the operation and print or write an export")
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Export format (see `setlab formats`)")
                        .default_value("text"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_name("FILE")
                        .help("Write the export to a file instead of stdout")
                        .value_parser(value_parser!(PathBuf)),
                ),
        )
        .subcommand(Command::new("regions").about("List every Venn region and its members"))
        .subcommand(
            Command::new("diagram")
                .about("Draw the Venn diagram in the terminal")
                .arg(
                    Arg::new("width")
                        .long("width")
                        .help("Diagram width in columns")
                        .value_parser(value_parser!(u16)),
                )
                .arg(
                    Arg::new("height")
                        .long("height")
                        .help("Diagram height in rows")
                        .value_parser(value_parser!(u16)),
                )
                .arg(
                    Arg::new("plain")
                        .long("plain")
                        .help("Print without colours")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("save").about("Write the inputs to a project file").arg(
                Arg::new("output")
                    .long("output")
                    .short('o')
                    .value_name("FILE")
                    .help("Project file to write")
                    .required(true)
                    .value_parser(value_parser!(PathBuf)),
            ),
        )
        .subcommand(Command::new("formats").about("List all available export formats"))
}

/// Flags describing the sets and the operation, shared by every subcommand
fn input_args() -> Vec<Arg> {
    let mut args = vec![
        Arg::new("project")
            .long("project")
            .short('p')
            .value_name("FILE")
            .help("Start from a saved project file")
            .value_parser(value_parser!(PathBuf))
            .global(true),
        Arg::new("num-sets")
            .long("num-sets")
            .short('n')
            .help("Number of sets (2 to 4)")
            .value_parser(value_parser!(usize))
            .global(true),
    ];
    for label in Label::ALL {
        let letter = label.as_str();
        args.push(
            Arg::new(letter)
                .short(letter.chars().next().unwrap_or('A'))
                .value_name("ELEMENTS")
                .help(format!("Elements of set {letter}, separated by spaces or commas"))
                .global(true),
        );
    }
    args.extend([
        Arg::new("op")
            .long("op")
            .help("union, intersection, difference, symdiff or expression")
            .global(true),
        Arg::new("first")
            .long("first")
            .help("First operand of difference and symdiff")
            .global(true),
        Arg::new("second")
            .long("second")
            .help("Second operand of difference and symdiff")
            .global(true),
        Arg::new("expr")
            .long("expr")
            .short('e')
            .help("Set expression such as \"A ∩ (B ∪ C)\"; implies --op expression")
            .global(true),
    ]);
    args
}

fn init_logging(verbosity: u8, quiet: bool) {
    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };
    let _ = TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}

fn run(matches: &ArgMatches) -> Result<(), SetlabError> {
    match matches.subcommand() {
        Some(("compute", sub)) => handle_compute_command(sub),
        Some(("regions", sub)) => handle_regions_command(sub),
        Some(("diagram", sub)) => handle_diagram_command(sub),
        Some(("save", sub)) => handle_save_command(sub),
        Some(("formats", sub)) => handle_formats_command(sub),
        _ => unreachable!(),
    }
}

/// Defaults, then `./setlab.toml`, then `--config`, then flag overrides
fn load_config(matches: &ArgMatches) -> Result<SetlabConfig, SetlabError> {
    let mut loader = Loader::new().with_optional_file(LOCAL_CONFIG_FILE);
    if let Some(path) = matches.get_one::<PathBuf>("config") {
        loader = loader.with_file(path);
    }
    if let Ok(Some(width)) = matches.try_get_one::<u16>("width") {
        loader = loader.set_override("diagram.width", i64::from(*width))?;
    }
    if let Ok(Some(height)) = matches.try_get_one::<u16>("height") {
        loader = loader.set_override("diagram.height", i64::from(*height))?;
    }
    Ok(loader.build()?)
}

/// Build the workspace from the project file (if any) and the input flags
fn load_workspace(matches: &ArgMatches) -> Result<Workspace, SetlabError> {
    let mut workspace = match matches.get_one::<PathBuf>("project") {
        Some(path) => load_project(path)?,
        None => Workspace::default(),
    };

    if let Some(count) = matches.get_one::<usize>("num-sets") {
        workspace.set_count(SetCount::new(*count)?);
    }
    for label in Label::ALL {
        if let Some(raw) = matches.get_one::<String>(label.as_str()) {
            workspace.set_input(label, raw.as_str())?;
        }
    }

    let mut choice: OperationChoice = workspace.choice().clone();
    if let Some(op) = matches.get_one::<String>("op") {
        choice.kind = op.parse()?;
    }
    if let Some(first) = matches.get_one::<String>("first") {
        choice.first = first.parse()?;
    }
    if let Some(second) = matches.get_one::<String>("second") {
        choice.second = second.parse()?;
    }
    if let Some(expr) = matches.get_one::<String>("expr") {
        choice.kind = OperationKind::Expression;
        choice.expression = expr.clone();
    }
    workspace.choose(choice);
    Ok(workspace)
}

/// Handle the compute command
fn handle_compute_command(matches: &ArgMatches) -> Result<(), SetlabError> {
    let config = load_config(matches)?;
    let registry = FormatRegistry::from_config(&config);
    let format = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("text");
    if !registry.has(format) {
        return Err(FormatError::FormatNotFound(format.to_string()).into());
    }

    let mut workspace = load_workspace(matches)?;
    let computation = workspace.compute()?;
    let output = registry.serialize(computation, format)?;

    match matches.get_one::<PathBuf>("output") {
        Some(path) => {
            write_atomic(path, output.as_bytes())?;
            println!("Wrote {} export to {}", format, path.display());
        }
        None => print!("{}", output),
    }
    Ok(())
}

/// Handle the regions command
fn handle_regions_command(matches: &ArgMatches) -> Result<(), SetlabError> {
    let mut workspace = load_workspace(matches)?;
    let computation = workspace.compute()?;
    let labels = computation.labels();

    println!("Regions for {}:", computation.description());
    for region in computation.regions().iter() {
        let flag = if region.active { "*" } else { " " };
        println!(
            "  {} {} {:<18} {}",
            region.mask,
            flag,
            region.mask.describe(labels),
            format_set(&region.elements)
        );
    }
    println!("\n* = part of the result");
    Ok(())
}

/// Handle the diagram command
fn handle_diagram_command(matches: &ArgMatches) -> Result<(), SetlabError> {
    let config = load_config(matches)?;
    let mut workspace = load_workspace(matches)?;
    let diagram = Diagram::from_computation(workspace.compute()?);
    let buffer = render_to_buffer(
        &diagram,
        config.diagram.width,
        config.diagram.height,
        config.diagram.marker.into(),
    );

    let mut stdout = std::io::stdout();
    if matches.get_flag("plain") || !stdout.is_terminal() {
        print!("{}", buffer_to_text(&buffer));
    } else {
        write_colored(&mut stdout, &buffer)?;
    }
    Ok(())
}

/// Handle the save command
fn handle_save_command(matches: &ArgMatches) -> Result<(), SetlabError> {
    let workspace = load_workspace(matches)?;
    let path: &Path = matches
        .get_one::<PathBuf>("output")
        .map(PathBuf::as_path)
        .ok_or_else(|| SetlabError::Project("missing --output".to_string()))?;
    save_project(&workspace, path)?;
    println!("Project saved to {}", path.display());
    Ok(())
}

/// Handle the formats command
fn handle_formats_command(matches: &ArgMatches) -> Result<(), SetlabError> {
    let registry = FormatRegistry::from_config(&load_config(matches)?);
    println!("Available formats:");
    for name in registry.list_formats() {
        let description = registry
            .get(&name)
            .map(|formatter| formatter.description())
            .unwrap_or("");
        println!("  {:<6} {}", name, description);
    }
    Ok(())
}
