//! Export file naming

use chrono::{DateTime, SecondsFormat, Utc};

/// File name for an export made at `now`
///
/// The RFC 3339 timestamp has its colons replaced by hyphens and its
/// fractional seconds removed: `story-2026-10-18T05-47-00.pdf`.
pub fn export_filename(now: DateTime<Utc>) -> String {
    let stamp = now
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace(':', "-");
    let stamp = stamp.split('.').next().unwrap_or_default();
    format!("story-{}.pdf", stamp)
}
