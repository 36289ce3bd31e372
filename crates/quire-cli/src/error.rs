//! Exit codes for failed commands.
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Success |
//! | 1 | Article not found, or an unexpected failure |
//! | 2 | Invalid arguments, dates or configuration |
//! | 3 | An archive page could not be fetched |

use quire_core::Error;

/// Exit code for an article that does not exist in the archive.
pub const NOT_FOUND: u8 = 1;

/// Map a failed command to its exit code.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<Error>() {
        Some(e) if e.is_caller_error() || matches!(e, Error::Config(_)) => 2,
        Some(Error::Fetch { .. } | Error::Network(_)) => 3,
        _ => 1,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_exit_codes() {
        let validation = anyhow::Error::from(Error::Validation("bad date".into()));
        assert_eq!(exit_code(&validation), 2);

        let config = anyhow::Error::from(Error::Config("no head".into()));
        assert_eq!(exit_code(&config), 2);

        let fetch: anyhow::Result<()> = Err(Error::Fetch {
            url: "https://example.com/a.json".into(),
            status: 500,
        })
        .context("Failed to open archive");
        assert_eq!(exit_code(&fetch.unwrap_err()), 3);

        assert_eq!(exit_code(&anyhow::anyhow!("boom")), 1);
    }
}
