//! `cryptovault version` — display version and crypto parameters.

use console::style;

use crate::crypto::keys::RSA_KEY_BITS;
use crate::errors::Result;

/// Execute the `version` command.
pub fn execute() -> Result<()> {
    let current = env!("CARGO_PKG_VERSION");
    println!("cryptovault {current}");
    println!(
        "{}",
        style(format!("RSA-{RSA_KEY_BITS} OAEP (SHA-256), keys as Base64 PKCS#8 / SPKI")).dim()
    );
    Ok(())
}
