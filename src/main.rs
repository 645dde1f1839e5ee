use clap::{Parser as ClapParser, Subcommand, ValueEnum};
use log::LevelFilter;
use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
};
use treebuilder::cli::{self, BuildOptions, BuildResult, CliError, Format};

#[derive(ClapParser)]
#[command(name = "treebuilder")]
#[command(about = "treebuilder - Build XML and JSON trees from path-addressed bulk assignments")]
#[command(version)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Xml,
    Json,
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Xml => Format::Xml,
            OutputFormat::Json => Format::Json,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run a JSON script of write operations and print the tree
    Build {
        /// Script file (reads from stdin if not provided)
        #[arg(short, long)]
        script: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "xml")]
        format: OutputFormat,

        /// Element wrapping the whole tree in XML output
        #[arg(short, long)]
        root: Option<String>,

        /// Single-line output
        #[arg(short, long)]
        compact: bool,

        /// Only validate paths and filters, don't build
        #[arg(long)]
        syntax_only: bool,
    },

    /// List documentation topics
    Docs,

    /// Show documentation for a specific topic
    Doc {
        /// Topic name (use 'treebuilder docs' to list topics)
        topic: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let result = match cli.command {
        Commands::Build {
            script,
            format,
            root,
            compact,
            syntax_only,
        } => run_build(script, format.into(), root, compact, syntax_only),
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Doc { topic } => cli::get_doc_topic(&topic).map(|content| print!("{}", content)),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_build(
    script: Option<PathBuf>,
    format: Format,
    root: Option<String>,
    compact: bool,
    syntax_only: bool,
) -> Result<(), CliError> {
    let script = match script {
        Some(path) => fs::read_to_string(path)?,
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
        None => return Err(CliError::NoInput),
    };

    let options = BuildOptions {
        script,
        format,
        root,
        compact,
        syntax_only,
    };

    match cli::execute_build(&options)? {
        BuildResult::SyntaxValid { operations } => println!("Syntax is valid ({} operations)", operations),
        BuildResult::Output(output) => println!("{}", output),
    }
    Ok(())
}
