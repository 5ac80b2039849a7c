#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    query_text: String,
}

impl SearchQuery {
    pub fn new(query_text: String) -> Self {
        Self { query_text }
    }

    pub fn query_text(&self) -> &str {
        &self.query_text
    }

    pub fn is_empty_query(&self) -> bool {
        self.query_text.trim().is_empty()
    }

    /// Text handed to the embedding model, e.g. `search_query: <query>`.
    pub fn tagged(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.query_text)
    }
}

/// One row returned by a nearest-neighbour lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedChunk {
    pub content: String,
    pub distance: f64,
}
