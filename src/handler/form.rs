//! POST form handling
//!
//! Parses `application/x-www-form-urlencoded` bodies and keeps the most
//! recent one in a single-slot store. Each POST replaces the previous slot
//! wholesale; concurrent POSTs race with last-writer-wins.

use std::collections::HashMap;
use std::sync::Mutex;

/// Parse a urlencoded body into a key/value mapping.
#[must_use]
pub fn parse_form(body: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(body.as_bytes())
        .into_owned()
        .collect()
}

/// Single-slot store for the most recently submitted form.
#[derive(Debug, Default)]
pub struct FormStore {
    slot: Mutex<Option<HashMap<String, String>>>,
}

impl FormStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored form. The previous slot is discarded, not appended to.
    pub fn replace(&self, fields: HashMap<String, String>) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(fields);
        }
    }

    /// Clone out the current slot, `None` if nothing was ever posted.
    #[must_use]
    pub fn snapshot(&self) -> Option<HashMap<String, String>> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pairs() {
        let fields = parse_form("a=1&b=2");
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["a"], "1");
        assert_eq!(fields["b"], "2");
    }

    #[test]
    fn decodes_percent_and_plus() {
        let fields = parse_form("name=John+Doe&city=S%C3%A3o+Paulo");
        assert_eq!(fields["name"], "John Doe");
        assert_eq!(fields["city"], "São Paulo");
    }

    #[test]
    fn empty_body_parses_to_empty_map() {
        assert!(parse_form("").is_empty());
    }

    #[test]
    fn replace_overwrites_the_slot() {
        let store = FormStore::new();
        assert!(store.snapshot().is_none());

        store.replace(parse_form("a=1&b=2"));
        let first = store.snapshot().unwrap();
        assert_eq!(first["a"], "1");

        store.replace(parse_form("c=3"));
        let second = store.snapshot().unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second["c"], "3");
        assert!(!second.contains_key("a"));
    }
}
