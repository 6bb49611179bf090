use crc32fast::Hasher;
use uuid::Uuid;

/// Generate a short, stable scope ID from an arbitrary name using CRC32
pub fn get_scope_id(name: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(name.as_bytes());
    format!("{:08x}", hasher.finalize())
}

/// Sequential ID generator for blocks within a page.
///
/// IDs look like `{prefix}-{seed}-{count}`. The counter only moves forward,
/// so an ID handed out once is never handed out again by the same generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IDGenerator {
    seed: String,
    count: u32,
}

impl IDGenerator {
    /// Deterministic generator for a named scope
    pub fn new(scope: &str) -> Self {
        Self {
            seed: get_scope_id(scope),
            count: 0,
        }
    }

    /// Generator seeded from a random UUID (one per freshly created or loaded page)
    pub fn fresh() -> Self {
        Self::new(&Uuid::new_v4().to_string())
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Generate next sequential ID
    pub fn new_id(&mut self, prefix: &str) -> String {
        self.count += 1;
        format!("{}-{}-{}", prefix, self.seed, self.count)
    }

    /// Get the generator seed
    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Number of IDs handed out so far
    pub fn count(&self) -> u32 {
        self.count
    }
}

impl Default for IDGenerator {
    fn default() -> Self {
        Self::fresh()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_id_generation() {
        let id1 = get_scope_id("home");
        let id2 = get_scope_id("home");

        // Same scope always generates same ID
        assert_eq!(id1, id2);
        assert_eq!(id1.len(), 8);

        // Different scopes generate different IDs
        let id3 = get_scope_id("about");
        assert_ne!(id1, id3);
    }

    #[test]
    fn test_sequential_ids() {
        let mut gen = IDGenerator::new("home");

        let id1 = gen.new_id("hero");
        let id2 = gen.new_id("text");
        let id3 = gen.new_id("hero");

        assert!(id1.starts_with("hero-"));
        assert!(id1.ends_with("-1"));
        assert!(id2.ends_with("-2"));
        assert!(id3.ends_with("-3"));
        assert_eq!(gen.count(), 3);

        let seed = gen.seed().to_string();
        assert!(id2.contains(&seed));
    }

    #[test]
    fn test_fresh_generators_do_not_collide() {
        let mut a = IDGenerator::fresh();
        let mut b = IDGenerator::fresh();

        assert_ne!(a.seed(), b.seed());
        assert_ne!(a.new_id("text"), b.new_id("text"));
    }

    #[test]
    fn test_cloned_generator_continues_sequence() {
        let mut gen = IDGenerator::from_seed("abc".to_string());
        gen.new_id("hero");

        let mut cloned = gen.clone();
        assert_eq!(cloned.new_id("hero"), "hero-abc-2");
    }
}
