mod commands;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use contentsnap_core::{
    GenerateOptions, ResolvePaths, DEFAULT_CATALOGUE, DEFAULT_DESTINATION, DEFAULT_MANIFEST,
    DEFAULT_OUTPUT,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "contentsnap",
    version,
    about = "Resolve content snap versions against a library version catalogue"
)]
struct Cli {
    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(flatten)]
    resolve: ResolveArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Positional arguments of the default (resolve) action.
#[derive(Debug, Args)]
struct ResolveArgs {
    /// Content snap manifest whose `version` fields name catalogue libraries.
    #[arg(default_value = DEFAULT_MANIFEST)]
    manifest: PathBuf,
    /// Version catalogue TOML with a `libraries` table.
    #[arg(default_value = DEFAULT_CATALOGUE)]
    catalogue: PathBuf,
    /// Where to write the resolved manifest.
    #[arg(default_value = DEFAULT_OUTPUT)]
    output: PathBuf,
}

impl From<ResolveArgs> for ResolvePaths {
    fn from(args: ResolveArgs) -> Self {
        Self {
            manifest: args.manifest,
            catalogue: args.catalogue,
            output: args.output,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate content snap build directories from templates.
    Generate {
        /// Content snap manifest; its catalogue is read from `<stem>.versions.toml`.
        #[arg(short, long)]
        manifest: PathBuf,
        /// Generate snaps in this directory.
        #[arg(short, long, default_value = DEFAULT_DESTINATION)]
        destination: PathBuf,
        /// Directory with content snap templates.
        #[arg(short = 't', long = "template-directory")]
        templates: PathBuf,
    },
    /// Generate shell completions for bash, zsh, fish, elvish, or powershell.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
    /// Generate man pages in the specified directory.
    ManPages {
        /// Output directory for man pages.
        #[arg(default_value = "man")]
        dir: PathBuf,
    },
}

fn main() -> ExitCode {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe")
            || msg.contains("broken pipe")
            || msg.contains("os error 32")
            || msg.contains("failed printing to stdout")
        {
            std::process::exit(0);
        }
        default_hook(info);
    }));

    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("CONTENTSNAP_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let json_output = cli.json;

    let result = match cli.command {
        None => commands::resolve::run(&cli.resolve.into(), json_output),
        Some(Commands::Generate {
            manifest,
            destination,
            templates,
        }) => commands::generate::run(
            &GenerateOptions {
                manifest,
                destination,
                templates,
            },
            json_output,
        ),
        Some(Commands::Completions { shell }) => commands::completions::run::<Cli>(shell),
        Some(Commands::ManPages { dir }) => commands::man_pages::run::<Cli>(&dir),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            ExitCode::from(commands::exit_code_for(&msg))
        }
    }
}
