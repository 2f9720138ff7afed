//! Interaction paths, the path-keyed content cache, and cache write-back.

use std::collections::HashMap;

use crate::streaming::ContentStreamState;

pub const PATH_KEY_DELIMITER: &str = "__";

/// Interaction ids accumulated since the active app was opened.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InteractionPath {
    segments: Vec<String>,
}

impl InteractionPath {
    /// Starts a new path at `app_id`.
    pub fn start(&mut self, app_id: &str) {
        self.segments.clear();
        self.segments.push(app_id.to_string());
    }

    /// Replaces the path with a single interaction id.
    pub fn restart_with(&mut self, id: &str) {
        self.start(id);
    }

    pub fn push(&mut self, id: &str) {
        self.segments.push(id.to_string());
    }

    pub fn clear(&mut self) {
        self.segments.clear();
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the cache key: segments joined with [`PATH_KEY_DELIMITER`].
    ///
    /// Plain ids are joined verbatim (`notepad_app__notepad_save`). A segment that could blur a
    /// boundary (contains the delimiter, starts or ends with `_`, contains `%`, or is empty) is
    /// percent-escaped first, so distinct paths never share a key.
    pub fn key(&self) -> String {
        self.segments
            .iter()
            .map(|segment| encode_segment(segment))
            .collect::<Vec<_>>()
            .join(PATH_KEY_DELIMITER)
    }
}

fn encode_segment(segment: &str) -> String {
    let ambiguous = segment.is_empty()
        || segment.contains(PATH_KEY_DELIMITER)
        || segment.starts_with('_')
        || segment.ends_with('_')
        || segment.contains('%');
    if !ambiguous {
        return segment.to_string();
    }
    if segment.is_empty() {
        return "%".to_string();
    }
    segment.replace('%', "%25").replace('_', "%5F")
}

/// Final generated content keyed by interaction path.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathCache {
    entries: HashMap<String, String>,
    writes: u64,
}

impl PathCache {
    pub fn get(&self, path: &InteractionPath) -> Option<&str> {
        self.entries.get(&path.key()).map(String::as_str)
    }

    pub fn put(&mut self, path: &InteractionPath, content: String) {
        self.entries.insert(path.key(), content);
        self.writes = self.writes.saturating_add(1);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of writes since the cache was created.
    pub fn writes(&self) -> u64 {
        self.writes
    }
}

/// Persists finished content for the current path.
///
/// Writes only once the stream has settled (not busy, no error) so the cache never holds a
/// partial chunk or an error fragment. Returns `true` when an entry was written.
pub fn write_back(
    cache: &mut PathCache,
    path: &InteractionPath,
    content: &ContentStreamState,
    statefulness_enabled: bool,
) -> bool {
    if content.is_busy()
        || content.error().is_some()
        || path.is_empty()
        || !statefulness_enabled
        || content.buffer().is_empty()
    {
        return false;
    }
    if cache.get(path) == Some(content.buffer()) {
        return false;
    }
    cache.put(path, content.buffer().to_string());
    true
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn path(segments: &[&str]) -> InteractionPath {
        let mut path = InteractionPath::default();
        for segment in segments {
            path.push(segment);
        }
        path
    }

    #[test]
    fn plain_ids_join_with_double_underscore() {
        assert_eq!(
            path(&["notepad_app", "notepad_save"]).key(),
            "notepad_app__notepad_save"
        );
        assert_eq!(path(&["notepad_app"]).key(), "notepad_app");
    }

    #[test]
    fn ambiguous_segments_do_not_collide() {
        let pairs = [
            (path(&["a__b"]), path(&["a", "b"])),
            (path(&["a_", "b"]), path(&["a", "_b"])),
            (path(&["a%5F"]), path(&["a_"])),
            (path(&[""]), path(&[])),
            (path(&["", ""]), path(&["%"])),
        ];
        for (left, right) in pairs {
            assert_ne!(left.key(), right.key(), "{left:?} vs {right:?}");
        }
    }

    #[test]
    fn start_and_restart_reset_segments() {
        let mut p = path(&["x", "y"]);
        p.start("drive");
        assert_eq!(p.segments(), ["drive".to_string()]);
        p.push("drive_new_button");
        p.restart_with("gmail_compose");
        assert_eq!(p.key(), "gmail_compose");
        p.clear();
        assert!(p.is_empty());
    }

    #[test]
    fn write_back_only_persists_settled_successful_content() {
        let mut cache = PathCache::default();
        let p = path(&["notepad_app"]);
        let mut content = ContentStreamState::default();

        let token = content.begin();
        content.apply_chunk(token, "<div>");
        assert!(!write_back(&mut cache, &p, &content, true));

        content.complete(token);
        assert!(!write_back(&mut cache, &p, &content, false));
        assert!(write_back(&mut cache, &p, &content, true));
        assert!(!write_back(&mut cache, &p, &content, true));
        assert_eq!(cache.get(&p), Some("<div>"));
        assert_eq!(cache.writes(), 1);

        let token = content.begin();
        content.fail(token);
        assert!(!write_back(&mut cache, &p, &content, true));
        assert_eq!(cache.get(&p), Some("<div>"));
    }

    #[test]
    fn clear_discards_entries() {
        let mut cache = PathCache::default();
        cache.put(&path(&["a"]), "x".to_string());
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get(&path(&["a"])), None);
    }
}
