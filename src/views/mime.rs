use std::collections::HashMap;

/// Logical output kind → MIME type table.
///
/// Unknown kinds resolve to themselves, so `"application/pdf"` can be passed
/// straight through as a kind.
#[derive(Debug, Clone)]
pub struct MimeTypes {
    types: HashMap<String, String>,
}

impl Default for MimeTypes {
    fn default() -> Self {
        let mut types = HashMap::new();
        for (kind, mime) in [
            ("html", "text/html"),
            ("text", "text/plain"),
            ("txt", "text/plain"),
            ("json", "application/json"),
            ("xml", "application/xml"),
            ("css", "text/css"),
            ("js", "application/javascript"),
            ("csv", "text/csv"),
        ] {
            types.insert(kind.to_string(), mime.to_string());
        }
        Self { types }
    }
}

impl MimeTypes {
    /// Add or override a kind
    pub fn register(&mut self, kind: impl Into<String>, mime: impl Into<String>) -> &mut Self {
        self.types.insert(kind.into(), mime.into());
        self
    }

    #[must_use]
    pub fn resolve<'a>(&'a self, kind: &'a str) -> &'a str {
        self.types.get(kind).map_or(kind, String::as_str)
    }
}

impl<K, V> Extend<(K, V)> for MimeTypes
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (kind, mime) in iter {
            self.register(kind, mime);
        }
    }
}
