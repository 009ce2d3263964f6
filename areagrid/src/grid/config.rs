
#[derive(Debug, Clone)]
pub struct Config {
    /// Registry capacity. The slot table is sized to the next power of two.
    pub max_entities: usize,
    /// Upper bound on `row_count * col_count`.
    pub max_cells: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_entities: 65_536,
            max_cells: 1 << 24,
        }
    }
}
