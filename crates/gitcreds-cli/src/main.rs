//! gitcreds - Git credentials and URL rewrites for CI jobs
//!
//! Usage:
//!   gitcreds configure --provider github --repositories 'acme/*' --token ...
//!   gitcreds credential-helper --config-file <file> get   # invoked by Git

mod signals;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use anyhow::{Context, Result};
use clap::builder::BoolishValueParser;
use clap::{Args, Parser, Subcommand};
use console::style;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gitcreds_core::config::Inputs;
use gitcreds_core::configure::{ConfigureReport, Configurator};
use gitcreds_core::context::AppContext;
use gitcreds_core::credential::{HelperOperation, run_operation};

#[derive(Parser)]
#[command(name = "gitcreds")]
#[command(about = "Configure Git credentials and URL rewrites", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite clone URLs and install credentials in the global Git config
    Configure(Box<ConfigureArgs>),

    /// Git credential helper protocol (called by Git)
    CredentialHelper {
        /// Helper side file, defaults to `<executable>.cfg`
        #[arg(long, short = 'c')]
        config_file: Option<PathBuf>,

        /// Operation requested by Git (get, store or erase)
        operation: Option<String>,
    },
}

#[derive(Args)]
struct ConfigureArgs {
    /// SCM provider: github, gitlab, bitbucket, bitbucket-datacenter or custom
    #[arg(long, env = "INPUT_PROVIDER")]
    provider: Option<String>,

    /// Whitespace or comma separated repository patterns (`org/repo`, `org/*`, `*/*`)
    #[arg(long, env = "INPUT_REPOSITORIES")]
    repositories: Option<String>,

    /// Personal access token for HTTPS
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// SSH private key, PEM or base64 encoded PEM
    #[arg(long, env = "INPUT_SSH_KEY", hide_env_values = true)]
    ssh_key: Option<String>,

    /// Known hosts entries added to the user's own
    #[arg(long, env = "INPUT_SSH_KNOWN_HOSTS")]
    ssh_known_hosts: Option<String>,

    /// Strict host key checking (default true)
    #[arg(long, env = "INPUT_SSH_STRICT", value_parser = BoolishValueParser::new())]
    ssh_strict: Option<bool>,

    #[arg(long, env = "INPUT_GITHUB_SERVER_URL")]
    github_server_url: Option<String>,

    #[arg(long, env = "INPUT_GITLAB_SERVER_URL")]
    gitlab_server_url: Option<String>,

    /// Bitbucket Cloud or Data Center base URL
    #[arg(long, env = "INPUT_BITBUCKET_SERVER_URL")]
    bitbucket_server_url: Option<String>,

    /// TOML file with default inputs; flags and INPUT_* variables win
    #[arg(long, env = "INPUT_INPUTS_FILE")]
    inputs_file: Option<PathBuf>,

    /// CI event JSON used to infer the provider and repositories
    #[arg(long, env = "CLOUDBEES_EVENT_PATH")]
    event_path: Option<PathBuf>,
}

impl ConfigureArgs {
    fn inputs(&self) -> Inputs {
        Inputs {
            provider: self.provider.clone(),
            repositories: self.repositories.clone(),
            token: self.token.clone(),
            ssh_key: self.ssh_key.clone(),
            ssh_known_hosts: self.ssh_known_hosts.clone(),
            ssh_strict: self.ssh_strict,
            github_server_url: self.github_server_url.clone(),
            gitlab_server_url: self.gitlab_server_url.clone(),
            bitbucket_server_url: self.bitbucket_server_url.clone(),
        }
    }
}

fn main() -> Result<()> {
    // Initialize tracing; stdout belongs to the credential protocol
    let default_filter = if std::env::var("RUNNER_DEBUG").as_deref() == Ok("1") {
        "gitcreds=debug,info"
    } else {
        "gitcreds=info,warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Configure(args) => run_configure(*args),
        Commands::CredentialHelper {
            config_file,
            operation,
        } => run_helper(config_file, operation.as_deref()),
    }
}

fn run_configure(args: ConfigureArgs) -> Result<()> {
    let mut inputs = args.inputs();
    if let Some(path) = &args.inputs_file {
        inputs = Inputs::load(path)?.overlay(inputs);
    }

    let event_path = args.event_path.clone().or_else(|| {
        std::env::var_os("CLOUDBEES_HOME").map(|home| PathBuf::from(home).join("event.json"))
    });
    let xdg_config_home = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from);
    let ctx = AppContext::discover(xdg_config_home.as_deref())?.with_event_path(event_path);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .context("Failed to start signal handling runtime")?;
    let cancel = Arc::new(AtomicBool::new(false));
    runtime.spawn(signals::watch(Arc::clone(&cancel)));

    let report = Configurator::new(&ctx, &cancel)
        .run(inputs)
        .context("Failed to configure git credentials")?;
    print_report(&report);

    runtime.shutdown_background();
    Ok(())
}

fn print_report(report: &ConfigureReport) {
    println!();
    println!(
        "{} {} over {}",
        style("Configured").bold().green(),
        style(&report.provider).cyan(),
        style(report.transport).cyan()
    );
    for entry in &report.mapping {
        println!("  {}", style(&entry.canonical).green());
        for alias in &entry.aliases {
            println!("    {} {}", style("<-").dim(), alias);
        }
    }
    if report.mapping.is_empty() {
        println!("  {}", style("no repositories matched, only the helper was installed").yellow());
    }
    println!("  Git config: {}", report.git_config_path.display());
    if let Some(path) = &report.helper_config_path {
        println!("  Helper config: {}", path.display());
    }
    if let Some(path) = &report.private_key_path {
        println!("  SSH key: {}", path.display());
    }
}

fn run_helper(config_file: Option<PathBuf>, operation: Option<&str>) -> Result<()> {
    // Git expects unknown operations to be ignored
    let Some(operation) = operation.and_then(HelperOperation::parse) else {
        return Ok(());
    };

    let config_file = match config_file {
        Some(path) => path,
        None => default_helper_config()?,
    };

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut output = stdout.lock();
    run_operation(operation, &config_file, &mut stdin.lock(), &mut output)
        .with_context(|| format!("credential helper {operation:?} failed using {}", config_file.display()))?;
    output.flush().context("Failed to flush credential response")?;
    Ok(())
}

fn default_helper_config() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("cannot infer config file from executable name")?;
    Ok(config_path_for(&exe))
}

fn config_path_for(exe: &Path) -> PathBuf {
    let mut path = exe.as_os_str().to_owned();
    path.push(".cfg");
    PathBuf::from(path)
}
