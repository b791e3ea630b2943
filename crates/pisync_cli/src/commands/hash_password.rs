//! Hash-password command implementation.

use pisync_server::{Argon2PasswordService, PasswordService};

/// Hashes `password` with Argon2 and returns the PHC string.
pub fn hash(password: &str) -> Result<String, Box<dyn std::error::Error>> {
    Ok(Argon2PasswordService::new().hash_password(password)?)
}

/// Runs the hash-password command.
pub fn run(password: &str) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", hash(password)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies() {
        let hashed = hash("admin123").unwrap();
        assert!(Argon2PasswordService::new()
            .verify_password("admin123", &hashed)
            .unwrap());
    }
}
