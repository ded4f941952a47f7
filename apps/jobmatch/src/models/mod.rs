pub mod job;
pub mod ranking;

/// Best-effort result of a loop that may abort part-way: everything that
/// succeeded plus every error encountered along the way.
#[derive(Debug, Clone)]
pub struct Collected<T> {
    pub items: Vec<T>,
    pub errors: Vec<String>,
}

impl<T> Default for Collected<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            errors: Vec::new(),
        }
    }
}

impl<T> Collected<T> {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}
