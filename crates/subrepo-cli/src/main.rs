//! git-subrepo - embed and sync another repository's history in a subdirectory.

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

use commands::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let verbose = cli.verbose || env_flag("GIT_SUBREPO_VERBOSE");
    output::set_quiet(cli.quiet || env_flag("GIT_SUBREPO_QUIET"));
    init_tracing(verbose, cli.debug || env_flag("GIT_SUBREPO_DEBUG"));

    let result = match cli.command {
        Commands::Clone {
            remote,
            subdir,
            branch,
            force,
            method,
            message,
        } => commands::clone::run(&remote, subdir.as_deref(), branch, force, method, message),
        Commands::Init {
            subdir,
            branch,
            remote,
            method,
        } => commands::init::run(&subdir, branch, remote, method),
        Commands::Pull {
            subdir,
            all: _,
            branch,
            force,
            remote,
            update,
            message,
        } => commands::pull::run(commands::pull::Options {
            subdir,
            branch,
            force,
            remote,
            update,
            message,
        }),
        Commands::Push {
            subdir,
            local_branch,
            all: _,
            branch,
            force,
            remote,
            squash,
            update,
            message,
            file,
        } => commands::push::run(commands::push::Options {
            subdir,
            local_branch,
            branch,
            force,
            remote,
            squash,
            update,
            message,
            file,
        }),
        Commands::Fetch {
            subdir,
            all,
            branch,
            force,
            remote,
        } => commands::fetch::run(subdir, all, branch, force, remote),
        Commands::Branch {
            subdir,
            all,
            fetch,
            force,
        } => commands::branch::run(subdir, all, fetch, force),
        Commands::Commit {
            subdir,
            commit_ref,
            fetch,
            force,
            message,
        } => commands::commit::run(&subdir, commit_ref.as_deref(), fetch, force, message),
        Commands::Status {
            subdirs,
            all: _,
            all_nested,
            fetch,
            json,
        } => commands::status::run(&subdirs, all_nested, fetch, json, verbose),
        Commands::Clean {
            subdir,
            all,
            all_nested,
            force,
        } => commands::clean::run(subdir, all || all_nested, all_nested, force),
        Commands::Config {
            subdir,
            option,
            value,
            force,
        } => commands::config::run(&subdir, &option, value.as_deref(), force),
        Commands::Version => {
            commands::version::run();
            Ok(())
        }
        Commands::Upgrade => {
            commands::version::run_upgrade();
            Ok(())
        }
    };

    if let Err(e) = result {
        let msg = e.to_string();
        if !msg.is_empty() {
            output::error(&msg);
        }
        std::process::exit(1);
    }
}

/// Whether an environment variable is set to a true-ish value.
fn env_flag(name: &str) -> bool {
    std::env::var(name).is_ok_and(|value| !value.is_empty() && value != "0" && value != "false")
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `--debug` shows every git command,
/// `--verbose` the steps of each command, and the default only errors.
fn init_tracing(verbose: bool, debug: bool) {
    let default = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "error"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();
}
