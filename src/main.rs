use clap::{Parser, Subcommand};
use colored::*;
use std::process;

mod api;
mod auth;
mod commands;
mod config;
mod utils;

use api::Gateway;
use auth::CredentialStore;
use commands::{
    AddOwner, CleanSessions, Context, Delete, Deprecate, Logout, Me, Operation, Push, Register,
    Rename,
};
use config::Config;
use utils::error::TrunkResult;

#[derive(Parser)]
#[command(
    name = "trunk",
    version = env!("CARGO_PKG_VERSION"),
    about = "Command-line client for the trunk package registry",
    long_about = "Interact with the trunk API: register sessions, publish podspecs, and manage pod owners."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true, help = "Show the raw request/response exchange")]
    verbose: bool,

    #[arg(
        long,
        global = true,
        env = "TRUNK_TOKEN",
        hide_env_values = true,
        help = "Session token, overriding the credential file"
    )]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new account, or create a new session
    Register {
        /// Email address to register
        email: String,

        /// Your name (required on first registration)
        name: Option<String>,

        #[arg(long, help = "An arbitrary description to identify the session later on")]
        description: Option<String>,
    },

    /// Display information about your sessions
    Me {
        #[command(subcommand)]
        command: Option<MeCommands>,
    },

    /// Add an owner to a pod
    AddOwner {
        /// Name of the pod
        pod: String,

        /// Email address of the new owner
        email: String,
    },

    /// Publish a podspec
    Push {
        /// Path to the podspec file, or a directory containing it
        path: Option<String>,

        #[arg(long, help = "Allows push even if there are lint warnings")]
        allow_warnings: bool,
    },

    /// Delete a version of a pod
    Delete {
        /// Name of the pod
        name: String,

        /// Version to delete
        version: String,

        #[arg(long, help = "Skip the confirmation prompt")]
        yes: bool,
    },

    /// Deprecate a pod
    Deprecate {
        /// Name of the pod
        name: String,

        /// Version to deprecate (all versions when omitted)
        version: Option<String>,

        #[arg(long, help = "Name of the pod this one is deprecated in favor of")]
        in_favor_of: Option<String>,
    },

    /// Remove the local session credential
    Logout,
}

#[derive(Subcommand)]
enum MeCommands {
    /// Remove expired and unverified sessions
    CleanSessions {
        #[arg(long, help = "Removes all your sessions, except for the current one")]
        all: bool,
    },

    /// Rename your account
    Rename {
        /// New account name
        name: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> TrunkResult<()> {
    let config = Config::load()?;
    let mut store = CredentialStore::open()?;
    let host = config.registry_host()?;
    let token = match cli.token.filter(|token| !token.is_empty()) {
        Some(token) => Some(token),
        None => store.token(&host)?,
    };
    let gateway = Gateway::new(&config, token)?.verbose(cli.verbose);
    let mut ctx = Context {
        config,
        store,
        gateway,
    };

    match cli.command {
        Commands::Register {
            email,
            name,
            description,
        } => {
            dispatch(
                Register {
                    email,
                    name,
                    description,
                },
                &mut ctx,
            )
            .await
        }
        Commands::Me { command: None } => dispatch(Me, &mut ctx).await,
        Commands::Me {
            command: Some(MeCommands::CleanSessions { all }),
        } => dispatch(CleanSessions { remove_all: all }, &mut ctx).await,
        Commands::Me {
            command: Some(MeCommands::Rename { name }),
        } => dispatch(Rename { name }, &mut ctx).await,
        Commands::AddOwner { pod, email } => dispatch(AddOwner { pod, email }, &mut ctx).await,
        Commands::Push {
            path,
            allow_warnings,
        } => dispatch(Push::new(path, allow_warnings), &mut ctx).await,
        Commands::Delete { name, version, yes } => {
            dispatch(Delete { name, version, yes }, &mut ctx).await
        }
        Commands::Deprecate {
            name,
            version,
            in_favor_of,
        } => {
            dispatch(
                Deprecate {
                    name,
                    version,
                    in_favor_of,
                },
                &mut ctx,
            )
            .await
        }
        Commands::Logout => dispatch(Logout, &mut ctx).await,
    }
}

async fn dispatch<O: Operation>(op: O, ctx: &mut Context) -> TrunkResult<()> {
    op.validate(ctx)?;
    op.run(ctx).await
}
