use clap::{Parser, Subcommand};
use git_source_track::areas::tracker::Tracker;
use is_terminal::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
const LOG_ENV: &str = "GIT_SOURCE_TRACK_LOG";

#[derive(Parser)]
#[command(
    name = "git-source-track",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "Track downstream files against the upstream files they were derived from",
    long_about = "This tool allows one to put metadata in each file noting the last git \
    commit that the upstream file was inspected at. Using this metadata, the 'diff' \
    subcommand shows the changes that were made to the upstream file since. \
    Once the file matches its upstream sufficiently, 'set-valid' records the review.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[arg(long, global = true, help = "Path to the .gittrack file")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "show",
        about = "Show status of all files",
        long_about = "This command reports whether each tracked file is up to date with its upstream file(s). \
        Without a file, every tracked file under the validation root is reported."
    )]
    Show {
        #[arg(index = 1, help = "The file to report")]
        file: Option<PathBuf>,
    },
    #[command(
        name = "diff",
        about = "Show diff of file since last validation",
        long_about = "This command shows the upstream history since the file was last validated \
        and offers to validate it afterwards."
    )]
    Diff {
        #[arg(index = 1)]
        file: PathBuf,
        #[arg(long, help = "Initials recorded when validating")]
        initials: Option<String>,
    },
    #[command(
        name = "set-valid",
        about = "Set validation metadata in specified file",
        long_about = "This command records that the file was reviewed against the current upstream commit \
        of the given upstream file(s)."
    )]
    SetValid {
        #[arg(index = 1)]
        file: PathBuf,
        #[arg(index = 2, help = "Upstream file(s) the file is derived from")]
        original_paths: Vec<String>,
        #[arg(long, help = "Initials recorded with the validation")]
        initials: Option<String>,
    },
    #[command(name = "set-notrack", about = "Set special notrack metadata in file")]
    SetNotrack {
        #[arg(index = 1)]
        file: PathBuf,
    },
    #[command(name = "show-log", about = "Show logs of file in upstream root")]
    ShowLog {
        #[arg(index = 1)]
        file: PathBuf,
    },
    #[command(name = "update-src", about = "Update the source of a file if it's renamed")]
    UpdateSrc {
        #[arg(index = 1)]
        file: PathBuf,
    },
    #[command(
        name = "upstream-checkout",
        about = "Set upstream git repo to commit specified in config"
    )]
    UpstreamCheckout,
    #[command(
        name = "upstream-pull",
        about = "Update upstream git repo and set commit in config"
    )]
    UpstreamPull {
        #[arg(long, default_value = "origin")]
        remote: String,
        #[arg(long, default_value = "master")]
        branch: String,
    },
    #[command(
        name = "upstream-track",
        about = "Set upstream_commit to be whatever commit upstream happens to be at"
    )]
    UpstreamTrack,
}

impl Commands {
    fn is_upstream_maintenance(&self) -> bool {
        matches!(
            self,
            Commands::UpstreamCheckout | Commands::UpstreamPull { .. } | Commands::UpstreamTrack
        )
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let interactive = std::io::stdout().is_terminal();
    if !interactive {
        colored::control::set_override(false);
    }
    let paging = interactive && std::env::var_os("NO_PAGER").is_none();

    let pwd = std::env::current_dir()?;
    let mut tracker = Tracker::open(
        cli.config.as_deref(),
        &pwd,
        Box::new(std::io::stdout()),
        Box::new(std::io::stdin().lock()),
    )?
    .with_paging(paging);

    let command = cli.command.unwrap_or(Commands::Show { file: None });
    tracker.check_upstream(!command.is_upstream_maintenance())?;

    match command {
        Commands::Show { file } => {
            if tracker.show(file.as_deref())?.has_errors() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Diff { file, initials } => tracker.diff(&file, initials.as_deref())?,
        Commands::SetValid {
            file,
            original_paths,
            initials,
        } => {
            tracker.set_valid(&file, &original_paths, initials.as_deref())?;
        }
        Commands::SetNotrack { file } => tracker.set_notrack(&file)?,
        Commands::ShowLog { file } => tracker.show_log(&file)?,
        Commands::UpdateSrc { file } => tracker.update_src(&file)?,
        Commands::UpstreamCheckout => tracker.upstream_checkout()?,
        Commands::UpstreamPull { remote, branch } => tracker.upstream_pull(&remote, &branch)?,
        Commands::UpstreamTrack => {
            tracker.upstream_track()?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
