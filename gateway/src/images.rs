//! Photo filename tokens and photo migration.
//!
//! Visitor photos are stored under filenames derived from the office login
//! timestamp. When a transfer opens a fresh office log, the photos taken at
//! the original sign-in are copied under the new login's token so the new
//! visit keeps its pictures.

use chrono::NaiveDateTime;
use log::warn;

use crate::traits::log_gateway::VisitorLogGateway;

/// Derives the photo filename token for a login timestamp.
///
/// Pure and deterministic: `2024-01-01 09:30:00` always maps to
/// `2024-01-01_09-30-00.png`.
pub fn token_from_timestamp(ts: NaiveDateTime) -> String {
    format!("{}.png", ts.format("%Y-%m-%d_%H-%M-%S"))
}

/// Copies the photo stored under `old_login`'s token to `new_login`'s token.
///
/// Best-effort: a missing or uncopyable photo must never block a sign-in,
/// so failures are logged and swallowed.
pub async fn migrate_photo(
    gateway: &dyn VisitorLogGateway,
    old_login: NaiveDateTime,
    new_login: NaiveDateTime,
) {
    let old_token = token_from_timestamp(old_login);
    let new_token = token_from_timestamp(new_login);

    if let Err(err) = gateway.duplicate_image(&old_token, &new_token).await {
        warn!(
            "photo migration {} -> {} failed: {}",
            old_token, new_token, err
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    /// Spaces become underscores, colons become hyphens, `.png` appended.
    #[test]
    fn token_encodes_timestamp() {
        assert_eq!(
            token_from_timestamp(ts("2024-01-01 09:30:00")),
            "2024-01-01_09-30-00.png"
        );
    }

    /// Same input, same token, every time.
    #[test]
    fn token_is_stable_across_calls() {
        let login = ts("2024-06-15 14:05:59");
        let first = token_from_timestamp(login);
        for _ in 0..10 {
            assert_eq!(token_from_timestamp(login), first);
        }
    }

    #[test]
    fn token_zero_pads_components() {
        assert_eq!(
            token_from_timestamp(ts("2024-02-03 04:05:06")),
            "2024-02-03_04-05-06.png"
        );
    }
}
