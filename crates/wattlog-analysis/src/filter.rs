//! Recent-window filtering of the reading history.

use time::Duration;

use wattlog_types::Reading;

/// Default recent window considered by the analysis commands.
pub const DEFAULT_RECENT_WINDOW: Duration = Duration::days(7);

/// Drop the leading prefix of readings older than `window` relative to
/// the last reading's query time.
pub fn filter_recent(history: &[Reading], window: Duration) -> &[Reading] {
    let Some(last) = history.last() else {
        return history;
    };

    let start = history
        .iter()
        .position(|r| last.query_time - r.query_time < window)
        .unwrap_or(history.len());
    &history[start..]
}
