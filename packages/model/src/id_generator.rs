use crate::Document;

/// Sequential id generator for nodes created inside a transaction
///
/// Ids are `{seed}-{n}`. `next_free` skips ids already present in the
/// document, so a generator can be created fresh for every transaction.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u32,
}

impl IdGenerator {
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
        }
    }

    /// Generate next sequential id
    pub fn new_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    /// Next sequential id not used by any node in `doc`
    pub fn next_free(&mut self, doc: &Document) -> String {
        loop {
            let id = self.new_id();
            if !doc.contains(&id) {
                return id;
            }
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new("n")
    }
}
