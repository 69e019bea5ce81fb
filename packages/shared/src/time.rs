use chrono::Local;

/// Human-readable local time string, e.g. `"3:42:07 PM"`.
///
/// Chat message timestamps are generated server-side at send time in this
/// format; they are display text, not something clients are expected to parse.
pub fn local_time_string() -> String {
    Local::now().format("%-I:%M:%S %p").to_string()
}
