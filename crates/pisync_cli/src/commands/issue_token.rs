//! Issue-token command implementation.

use pisync_server::{AuthConfig, TokenValidator};

/// Issues a bearer token for `user_id`/`username`, signed with `secret`.
///
/// Tokens carry their issue time; the server's configured expiry applies.
pub fn issue(
    secret: &str,
    user_id: u64,
    username: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    if secret.is_empty() {
        return Err("secret must not be empty".into());
    }

    let validator = TokenValidator::new(AuthConfig::new(secret.as_bytes().to_vec()));
    Ok(validator.create_token(user_id, username)?)
}

/// Runs the issue-token command. Falls back to `JWT_SECRET` when no secret is given.
pub fn run(
    secret: Option<String>,
    user_id: u64,
    username: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let secret = secret
        .or_else(|| std::env::var("JWT_SECRET").ok())
        .ok_or("--secret or JWT_SECRET required for issue-token")?;

    println!("{}", issue(&secret, user_id, username)?);
    Ok(())
}
