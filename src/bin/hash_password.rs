//! Print the SHA-256 hex digest of a password, for use as
//! `ADMIN_PASSWORD_HASH`.
//!
//! Usage: `hash-password <password>`, or pipe the password on stdin.

use std::io::Read;

use anyhow::{bail, Context};

use folio::auth::sha256_hex;

fn main() -> anyhow::Result<()> {
    let password = match std::env::args().nth(1) {
        Some(arg) => arg,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read password from stdin")?;
            buf.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    if password.is_empty() {
        bail!("Usage: hash-password <password> (or pipe the password on stdin)");
    }

    println!("{}", sha256_hex(&password));
    Ok(())
}
