//! Per-document sidenote numbering.

/// Issues sidenote ids for a single document.
///
/// A fresh counter starts at zero and hands out `1, 2, 3, …`. One counter is
/// created per [`SidenoteProcessor::extract`](super::SidenoteProcessor::extract)
/// call, so documents rendered concurrently never share numbering state.
///
/// # Example
///
/// ```
/// use margin_renderer::sidenote::SidenoteCounter;
///
/// let mut counter = SidenoteCounter::new();
/// assert_eq!(counter.next_id(), 1);
/// assert_eq!(counter.next_id(), 2);
/// assert_eq!(counter.issued(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SidenoteCounter {
    issued: u32,
}

impl SidenoteCounter {
    /// Create a counter that has issued nothing yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next id.
    pub fn next_id(&mut self) -> u32 {
        self.issued += 1;
        self.issued
    }

    /// Number of ids issued so far (also the last id issued).
    #[must_use]
    pub fn issued(&self) -> u32 {
        self.issued
    }
}
