//! Print a bcrypt hash for a password read from stdin.
//!
//! Run with: echo -n 'password' | cargo run -p number-dashboard --bin hash-password [USERNAME]
//!
//! With a username, prints a ready `AUTH__USERS__<NAME>='<hash>'` line.
//! Keep the single quotes in `.env`: bcrypt hashes contain `$`.

use anyhow::{bail, Context};
use std::io::Read;

fn main() -> anyhow::Result<()> {
    let username = std::env::args().nth(1);

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read password from stdin")?;

    // Tolerate the newline left by `echo` or an interactive prompt
    let password = input.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        bail!("Empty password");
    }

    let hash = number_dashboard::hash_password(password).context("Failed to hash password")?;

    match username {
        Some(name) => println!("AUTH__USERS__{}='{}'", name.to_uppercase(), hash),
        None => println!("{}", hash),
    }
    Ok(())
}
