use crate::outcome::Outcome;

/// Parses a TOML fragment strictly; duplicate keys and malformed values fail.
pub fn verify(body: &str) -> Outcome {
    match toml::from_str::<toml::Table>(body) {
        Ok(_) => Outcome::Passed,
        Err(e) => Outcome::failed(format!("TOML parsing error: {}", e.to_string().trim())),
    }
}
