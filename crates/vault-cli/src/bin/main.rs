//! cred-vault CLI - save and retrieve encrypted application credentials
//!
//! Saving encrypts with the key from the key file. Retrieval asks for a key
//! every time and never reads the key file.

use anyhow::Context;
use clap::Parser;
use std::io::{self, BufRead};
use std::process::ExitCode;
use tracing::debug;
use vault_core::SettingsManager;
use zeroize::Zeroizing;

use vault_cli::commands;
use vault_cli::{Cli, Command};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so command output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!("Command failed: {:?}", err);
            eprintln!("{}", commands::describe_error(&err));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let storage_dir = cli.storage_dir()?;
    let paths = cli.paths()?;
    debug!("Using data file {:?}, key file {:?}", paths.data_file, paths.key_file);

    match cli.command {
        Command::Keygen { show } => commands::keygen(&paths, show, &mut out),
        Command::Save {
            app,
            username,
            password_stdin,
        } => {
            let password = if password_stdin {
                read_stdin_line().context("Failed to read password from stdin")?
            } else {
                Zeroizing::new(rpassword::prompt_password("Password: ")?)
            };
            commands::save(&paths, &app, &username, &password, &mut out)
        }
        Command::List => commands::list(&paths, &mut out),
        Command::Get { app, decrypt_key } => {
            let key = match decrypt_key {
                Some(key) => Zeroizing::new(key),
                None => Zeroizing::new(rpassword::prompt_password("Decryption key: ")?),
            };
            commands::get(&paths, &app, &key, &mut out)
        }
        Command::Config { action } => {
            let mut manager = SettingsManager::new(&storage_dir);
            commands::config(&mut manager, action, &mut out)
        }
    }
}

fn read_stdin_line() -> io::Result<Zeroizing<String>> {
    let mut line = Zeroizing::new(String::new());
    io::stdin().lock().read_line(&mut line)?;

    let trimmed = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(trimmed);
    Ok(line)
}
