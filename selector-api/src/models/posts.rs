/// What one search page contributed to a scrape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Raw tag strings, one per post, in page order.
    Posts(Vec<String>),
    /// The page loaded but carried no extractable posts.
    Empty,
    /// Every fetch attempt failed, or the page job died.
    Failed(String),
}

impl PageOutcome {
    pub fn from_posts(posts: Vec<String>) -> Self {
        if posts.is_empty() {
            PageOutcome::Empty
        } else {
            PageOutcome::Posts(posts)
        }
    }

    pub fn post_count(&self) -> usize {
        match self {
            PageOutcome::Posts(p) => p.len(),
            PageOutcome::Empty | PageOutcome::Failed(_) => 0,
        }
    }

    pub fn into_posts(self) -> Vec<String> {
        match self {
            PageOutcome::Posts(p) => p,
            PageOutcome::Empty | PageOutcome::Failed(_) => Vec::new(),
        }
    }
}
