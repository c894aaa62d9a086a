//! Resets a user's password from the terminal.
//!
//! Passwords can only be reset on the machine hosting the app; there is no
//! web-facing reset flow.

use std::process::ExitCode;

use clap::Parser;
use rusqlite::Connection;

use washboard_rs::{Error, PasswordHash, ValidatedPassword, update_user_password};

/// Reset the password for a user of the washboard_rs database.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The username whose password should be reset.
    #[arg(long)]
    username: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let connection = match Connection::open(&args.db_path) {
        Ok(connection) => connection,
        Err(error) => {
            eprintln!("Could not open database {}: {error}", args.db_path);
            return ExitCode::FAILURE;
        }
    };

    let password = match rpassword::prompt_password("New password: ") {
        Ok(password) => password,
        Err(error) => {
            eprintln!("Could not read password: {error}");
            return ExitCode::FAILURE;
        }
    };

    let confirmation = match rpassword::prompt_password("Confirm new password: ") {
        Ok(confirmation) => confirmation,
        Err(error) => {
            eprintln!("Could not read password: {error}");
            return ExitCode::FAILURE;
        }
    };

    if password != confirmation {
        eprintln!("The passwords do not match.");
        return ExitCode::FAILURE;
    }

    let validated_password = match ValidatedPassword::new(&password) {
        Ok(validated_password) => validated_password,
        Err(Error::TooWeak(details)) => {
            eprintln!("The password is too weak: {details}");
            return ExitCode::FAILURE;
        }
        Err(error) => {
            eprintln!("Could not validate password: {error}");
            return ExitCode::FAILURE;
        }
    };

    let password_hash = match PasswordHash::new(validated_password) {
        Ok(password_hash) => password_hash,
        Err(error) => {
            eprintln!("Could not hash password: {error}");
            return ExitCode::FAILURE;
        }
    };

    match update_user_password(&args.username, password_hash, &connection) {
        Ok(()) => {
            println!("Updated the password for {}.", args.username);
            ExitCode::SUCCESS
        }
        Err(Error::NotFound) => {
            eprintln!("No user named {} exists in the database.", args.username);
            ExitCode::FAILURE
        }
        Err(error) => {
            eprintln!("Could not update password: {error}");
            ExitCode::FAILURE
        }
    }
}
