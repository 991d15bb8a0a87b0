pub mod code_files;
pub mod hero_slides;
pub mod projects;

use chrono::{DateTime, SecondsFormat, Utc};

/// Stored timestamp format for `$set` updates.
///
/// Matches the string chrono's serde impl writes on insert, so
/// `createdAt`/`updatedAt` sort consistently regardless of which path wrote
/// them.
pub(crate) fn timestamp_string(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_timestamps_match_insert_serialization() {
        let now = Utc::now();
        let via_serde = serde_json::to_value(now).unwrap();
        assert_eq!(via_serde.as_str().unwrap(), timestamp_string(now));
    }

    #[test]
    fn timestamps_use_z_suffix() {
        assert!(timestamp_string(Utc::now()).ends_with('Z'));
    }
}
