use gridql_core::stmt::Alias;

/// Hands out aliases that are unique within one compilation. Each compiled
/// statement gets its own allocator; it is threaded through every helper
/// that introduces a derived table.
#[derive(Debug, Default)]
pub struct AliasAllocator {
    next: usize,
}

impl AliasAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_alias(&mut self) -> Alias {
        let alias = Alias(format!("a{}", self.next));
        self.next += 1;
        alias
    }
}
