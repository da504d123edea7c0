mod cmd;
mod completions;
mod logging;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::engine::ArgValueCompleter;
use clap_complete::{CompleteEnv, Shell};
use mdexport_core::ExclusionConfig;
use mdexport_core::config::ConfigLoader;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "mdexp",
    version,
    about = "Export a markdown note and everything it links to as a zip archive"
)]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    profile: Option<String>,

    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate configuration and print resolved settings
    Doctor,

    /// Export a note and the notes it links to
    Export(ExportArgs),

    /// Print a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Note to export, as a vault-relative path or a link name
    #[arg(add = ArgValueCompleter::new(completions::complete_notes))]
    pub note: Option<String>,

    /// Archive path (defaults to <output_dir>/<note>.zip)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// List what would be exported without writing an archive
    #[arg(long)]
    pub dry_run: bool,

    /// Print the export report as JSON
    #[arg(long)]
    pub json: bool,

    /// Leave unreadable documents out instead of failing
    #[arg(long)]
    pub skip_unreadable: bool,

    /// Additional folder to exclude (repeatable)
    #[arg(long = "exclude-folder", value_name = "FOLDER")]
    pub exclude_folders: Vec<String>,

    /// Additional filename pattern to exclude, `*` is a wildcard (repeatable)
    #[arg(long = "exclude-file", value_name = "PATTERN")]
    pub exclude_files: Vec<String>,

    /// Additional heading text whose section is not followed (repeatable)
    #[arg(long = "exclude-header", value_name = "TEXT")]
    pub exclude_headers: Vec<String>,

    /// Additional frontmatter key that excludes a note when true (repeatable)
    #[arg(long = "exclude-key", value_name = "KEY")]
    pub exclude_keys: Vec<String>,
}

impl ExportArgs {
    /// Exclusion rules given on the command line.
    pub fn extra_exclusions(&self) -> ExclusionConfig {
        ExclusionConfig {
            frontmatter_keys: self.exclude_keys.clone(),
            headers: self.exclude_headers.clone(),
            folders: self.exclude_folders.clone(),
            files: self.exclude_files.clone(),
        }
    }
}

fn main() -> color_eyre::Result<()> {
    CompleteEnv::with_factory(Cli::command).complete();
    color_eyre::install()?;
    let cli = Cli::parse();

    let log_cfg = ConfigLoader::load(cli.config.as_deref(), cli.profile.as_deref())
        .map(|rc| rc.logging)
        .unwrap_or_default();
    logging::init(&log_cfg, cli.verbose);

    match cli.command {
        Commands::Doctor => cmd::doctor::run(cli.config.as_deref(), cli.profile.as_deref()),
        Commands::Export(args) => {
            cmd::export::run(cli.config.as_deref(), cli.profile.as_deref(), args)
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "mdexp", &mut std::io::stdout());
        }
    }

    Ok(())
}
