use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Last id timestamp handed out, for the monotonic tiebreak in `mint_id`.
static LAST_ID_MILLIS: AtomicI64 = AtomicI64::new(0);

/// Mint a timestamp-based entity id: `<prefix>-<millis>`.
///
/// Ids are millisecond wall-clock values with a process-wide monotonic
/// guard, so two entities created in the same millisecond still get
/// distinct ids. Prefixes in use: `proj`, `task`, `goal`, `kr`, `pmo`,
/// `cmt`.
pub fn mint_id(prefix: &str) -> String {
    let now = Utc::now().timestamp_millis();
    // fetch_update returns the previous value; the closure never declines.
    let prev = LAST_ID_MILLIS
        .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |prev| {
            Some(prev.max(now - 1) + 1)
        })
        .unwrap_or(now - 1);
    format!("{}-{}", prefix, prev.max(now - 1) + 1)
}

/// Three-letter uppercase code for an initiative name, the prefix of the
/// synthetic row keys used by dependency references.
///
/// Example: "Digital Transformation Q1" → "DIG"
pub fn initiative_code(name: &str) -> String {
    name.chars().take(3).collect::<String>().to_uppercase()
}

/// Check a sign-in email against the configured company domain.
///
/// The gate is a plain suffix match; an empty or missing domain admits
/// nobody rather than everybody.
pub fn is_authorized_email(email: &str, domain: Option<&str>) -> bool {
    match domain {
        Some(d) if !d.is_empty() => email
            .to_lowercase()
            .ends_with(&format!("@{}", d.to_lowercase())),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_id_has_prefix() {
        let id = mint_id("task");
        assert!(id.starts_with("task-"));
        assert!(id["task-".len()..].parse::<i64>().is_ok());
    }

    #[test]
    fn test_mint_id_never_repeats() {
        let mut ids: Vec<String> = (0..100).map(|_| mint_id("proj")).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_initiative_code() {
        assert_eq!(initiative_code("Digital Transformation Q1"), "DIG");
        assert_eq!(initiative_code("ab"), "AB");
        assert_eq!(initiative_code(""), "");
    }

    #[test]
    fn test_is_authorized_email() {
        assert!(is_authorized_email("jane@focuslearning.com", Some("focuslearning.com")));
        assert!(is_authorized_email("Jane@FocusLearning.com", Some("focuslearning.com")));
        assert!(!is_authorized_email("jane@other.com", Some("focuslearning.com")));
        assert!(!is_authorized_email("jane@focuslearning.com", None));
        assert!(!is_authorized_email("jane@focuslearning.com", Some("")));
    }
}
