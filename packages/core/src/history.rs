use crate::outcome::Outcome;

/// Append-only record of every [`Outcome`] produced by one navigator, oldest
/// first.
///
/// Only the navigator appends; callers get shared references, so recorded
/// outcomes are never rewritten.
#[derive(Debug, Default, Clone)]
pub struct History {
    entries: Vec<Outcome>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, outcome: Outcome) {
        self.entries.push(outcome);
    }

    /// The current outcome: the most recently appended one.
    pub fn last(&self) -> Option<&Outcome> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_slice(&self) -> &[Outcome] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Outcome> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a Outcome;
    type IntoIter = std::slice::Iter<'a, Outcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;
    use crate::outcome::HeaderMultimap;

    fn outcome(uri: &str) -> Outcome {
        Outcome::new(Method::Get, uri, 200, "OK", HeaderMultimap::new())
    }

    #[test]
    fn empty_history_has_no_current() {
        let h = History::new();
        assert!(h.is_empty());
        assert!(h.last().is_none());
    }

    #[test]
    fn last_is_most_recent_and_order_is_kept() {
        let mut h = History::new();
        for uri in ["/a", "/b", "/c"] {
            h.push(outcome(uri));
        }
        assert_eq!(h.len(), 3);
        assert_eq!(h.last().unwrap().uri(), "/c");
        let uris: Vec<&str> = h.iter().map(Outcome::uri).collect();
        assert_eq!(uris, ["/a", "/b", "/c"]);
        assert_eq!(h.as_slice()[0].uri(), "/a");
    }
}
