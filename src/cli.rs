//! Command line options for the mirror-mover tool
use crate::{config::MirrorMoverConfig, errors::MirrorMoverError, utils::main_sync};
use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;

/// mirror-mover - Mirror GitLab projects to GitHub
#[derive(Parser, Default, Clone, Debug)]
#[command(version, about)]
pub struct MirrorMoverCli {
    /// GitLab group to migrate (empty for your own projects)
    #[arg(long, visible_alias = "gitlaborg", env = "GITLAB_GROUP")]
    pub gitlab_group: Option<String>,

    /// GitLab access token
    #[arg(long, visible_alias = "gitlabtoken", env = "GITLAB_TOKEN", hide_env_values = true)]
    pub gitlab_token: Option<String>,

    /// GitLab instance URL [default: https://gitlab.com]
    #[arg(long, env = "GITLAB_URL")]
    pub gitlab_url: Option<String>,

    /// GitHub organization receiving the repositories (empty for your own account)
    #[arg(long, visible_alias = "githuborg", env = "GITHUB_ORG")]
    pub github_org: Option<String>,

    /// GitHub access token
    #[arg(long, visible_alias = "githubtoken", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// GitHub API URL [default: https://api.github.com]
    #[arg(long, env = "GITHUB_API_URL")]
    pub github_url: Option<String>,

    /// git executable used to clone and push
    #[arg(long, env = "MIRROR_MOVER_GIT", default_value = "git")]
    pub git: String,

    /// Custom configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Show the current config path
    #[arg(long)]
    pub show_config_path: bool,

    /// Verbose mode (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl MirrorMoverCli {
    /// Log level for the number of `-v`
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// Initialize the logger
fn init_logger(level: LevelFilter) {
    env_logger::builder()
        .filter_level(level)
        .format_target(false)
        .format_timestamp(None)
        .init();
}

/// Run the mirror-mover tool with the command line options
/// # Errors
/// Error if the configuration is invalid or the migration can't run
pub async fn mirror_mover_main() -> Result<(), MirrorMoverError> {
    dotenv::dotenv().ok();
    let args = MirrorMoverCli::parse();
    init_logger(args.log_level());
    let config = MirrorMoverConfig::try_new(args)?;
    if config.cli_args.show_config_path {
        println!("{}", config.config_path.display());
        return Ok(());
    }
    main_sync(config).await
}
