use pgvector::Vector;

#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    embedding: Vector,
}

impl Embedding {
    pub fn new(embedding: Vector) -> Self {
        Self { embedding }
    }

    pub fn vector(&self) -> &Vector {
        &self.embedding
    }

    pub fn as_slice(&self) -> &[f32] {
        self.embedding.as_slice()
    }

    pub fn dimension(&self) -> usize {
        self.as_slice().len()
    }

    /// Fails with a description of the mismatch when the vector length differs
    /// from the declared column dimension.
    pub fn ensure_dimension(&self, expected: usize) -> Result<(), String> {
        let actual = self.dimension();
        if actual != expected {
            return Err(format!(
                "expected {} dimensions, got {}",
                expected, actual
            ));
        }
        Ok(())
    }
}

impl From<Vec<f32>> for Embedding {
    fn from(values: Vec<f32>) -> Self {
        Self::new(Vector::from(values))
    }
}
