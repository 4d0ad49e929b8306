//! Configuration for array kernels.

use serde::{Deserialize, Serialize};

/// Configuration for elementwise kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementwiseConfig {
    /// Minimum number of output elements before kernels run on the rayon pool.
    /// Below this threshold, serial execution is used to avoid overhead.
    pub parallel_threshold: usize,
}

impl Default for ElementwiseConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 1 << 16,
        }
    }
}

impl ElementwiseConfig {
    /// Never use the thread pool.
    pub fn serial() -> Self {
        Self {
            parallel_threshold: usize::MAX,
        }
    }

    /// Always use the thread pool, regardless of size.
    pub fn parallel() -> Self {
        Self {
            parallel_threshold: 0,
        }
    }

    #[inline]
    pub fn use_parallel(&self, len: usize) -> bool {
        len >= self.parallel_threshold
    }
}
