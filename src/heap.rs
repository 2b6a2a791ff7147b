use super::{Error, Result};

/// The capability to allocate heap objects.
///
/// Every [`Map`] and [`Object`] is paid for by a call to `allocate()`. A
/// collecting implementation may run a collection inside `allocate()`, so
/// every caller is a potential collection point.
///
/// [`Map`]: crate::Map
/// [`Object`]: crate::Object
pub trait Allocator {
    /// Reserve `size` bytes, or report why that is impossible.
    ///
    /// On error, nothing has been reserved.
    fn allocate(&mut self, size: usize) -> Result<()>;
}

// ----------------------------------------------------------------------------

/// The default [`Allocator`]: counts bytes against an optional limit.
///
/// Nothing is ever freed; there is no collector.
#[derive(Debug, Default, Clone)]
pub struct Heap {
    limit: Option<usize>,
    used: usize,
    count: usize,
}

impl Heap {
    pub fn new(limit: Option<usize>) -> Self { Self {limit, used: 0, count: 0} }

    pub fn limit(&self) -> Option<usize> { self.limit }

    /// The total number of bytes allocated.
    pub fn used(&self) -> usize { self.used }

    /// The number of successful calls to `allocate()`.
    pub fn count(&self) -> usize { self.count }
}

impl Allocator for Heap {
    fn allocate(&mut self, size: usize) -> Result<()> {
        let used = self.used.saturating_add(size);
        if let Some(limit) = self.limit {
            if used > limit {
                tracing::warn!(size, used = self.used, limit, "allocation refused");
                return Err(Error::OutOfMemory {requested: size, used: self.used, limit});
            }
        }
        tracing::debug!("allocating: {}B", size);
        self.used = used;
        self.count += 1;
        Ok(())
    }
}

// ----------------------------------------------------------------------------
