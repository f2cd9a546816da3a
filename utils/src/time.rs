//! Time index formatting helpers.

/// Describe how far `target` lies from `now`, in time indices.
pub fn format_remaining(now: u64, target: u64) -> String {
    match target.cmp(&now) {
        std::cmp::Ordering::Greater => format!("in {}", plural(target - now)),
        std::cmp::Ordering::Equal => "now".to_string(),
        std::cmp::Ordering::Less => format!("{} ago", plural(now - target)),
    }
}

fn plural(n: u64) -> String {
    if n == 1 {
        "1 index".to_string()
    } else {
        format!("{n} indices")
    }
}
