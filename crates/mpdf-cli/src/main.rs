mod commands;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use mpdf_schema::{Orientation, PageSize};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "mpdf",
    version,
    about = "Compile, validate and inspect MPDF Markdown documents"
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

    /// Project config file (defaults to ./mpdf.toml, if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compile a Markdown file into an .mpdf container.
    Compile {
        /// Markdown source file.
        input: PathBuf,
        /// Output path (defaults to the input with an .mpdf extension).
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Theme name or id.
        #[arg(long)]
        theme: Option<String>,
        /// Page size: A4, letter or legal.
        #[arg(long)]
        page: Option<PageSize>,
        /// Page orientation: portrait or landscape.
        #[arg(long)]
        orientation: Option<Orientation>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        title: Option<String>,
        /// Document language tag (skips detection).
        #[arg(long)]
        lang: Option<String>,
        /// Comma-separated tags.
        #[arg(long, value_delimiter = ',')]
        tags: Option<Vec<String>>,
        #[arg(long)]
        description: Option<String>,
        /// Directory of font files to embed.
        #[arg(long)]
        fonts_dir: Option<PathBuf>,
    },
    /// Validate an .mpdf container and print the report.
    Validate {
        /// Path to the .mpdf file.
        file: PathBuf,
    },
    /// Show manifest summary, document statistics and entries.
    Info {
        /// Path to the .mpdf file.
        file: PathBuf,
    },
    /// Write the Markdown content of a container to stdout or a file.
    Extract {
        /// Path to the .mpdf file.
        file: PathBuf,
        /// Destination file (stdout when omitted).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Generate shell completions for bash, zsh, fish, elvish, or powershell.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
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
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("MPDF_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .init();

    let json_output = cli.json;

    let result = match cli.command {
        Commands::Compile {
            input,
            output,
            theme,
            page,
            orientation,
            author,
            title,
            lang,
            tags,
            description,
            fonts_dir,
        } => commands::compile::run(
            &commands::compile::CompileArgs {
                input,
                output,
                theme,
                page,
                orientation,
                author,
                title,
                lang,
                tags,
                description,
                fonts_dir,
            },
            cli.config.as_deref(),
            json_output,
        ),
        Commands::Validate { file } => commands::validate::run(&file, json_output),
        Commands::Info { file } => commands::info::run(&file, json_output),
        Commands::Extract { file, output } => {
            commands::extract::run(&file, output.as_deref(), json_output)
        }
        Commands::Completions { shell } => commands::completions::run::<Cli>(shell),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            ExitCode::from(commands::exit_code_for(&msg))
        }
    }
}
