#[derive(Debug, Clone, PartialEq)]
pub struct ContentChunk {
    chunk_text: String,
    chunk_index: usize,
}

impl ContentChunk {
    pub fn new(chunk_text: String, chunk_index: usize) -> Self {
        Self {
            chunk_text,
            chunk_index,
        }
    }

    // Getters
    pub fn chunk_text(&self) -> &str {
        &self.chunk_text
    }

    pub fn chunk_index(&self) -> usize {
        self.chunk_index
    }

    /// Text handed to the embedding model, e.g. `search_document: <chunk>`.
    pub fn tagged(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.chunk_text)
    }
}
