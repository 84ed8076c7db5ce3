//! Parallelism hint shared by training and batch queries.
//!
//! Components receive a [`Parallelism`] hint and downgrade to sequential
//! execution when their workload is too small to benefit from threads.

use rayon::prelude::*;

/// Parallelism strategy for forest training and batch queries.
///
/// This is a hint: a batch of three queries runs sequentially even when
/// `Parallel(8)` is requested.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Parallelism {
    /// Strictly sequential execution, no rayon tasks.
    #[default]
    Sequential,
    /// Allow rayon tasks on up to `n` threads. `n <= 1` behaves as `Sequential`.
    Parallel(usize),
}

impl Parallelism {
    /// Create a hint from a thread count.
    ///
    /// - `0` → rayon's current thread count
    /// - `1` → sequential
    /// - `n > 1` → parallel with n threads
    #[inline]
    pub fn from_threads(n_threads: usize) -> Self {
        match n_threads {
            0 => Self::Parallel(rayon::current_num_threads()),
            1 => Self::Sequential,
            n => Self::Parallel(n),
        }
    }

    #[inline]
    pub fn allows_parallel(self) -> bool {
        matches!(self, Self::Parallel(n) if n > 1)
    }

    /// Thread count hint (1 for sequential).
    #[inline]
    pub fn n_threads(self) -> usize {
        match self {
            Self::Sequential => 1,
            Self::Parallel(n) => n.max(1),
        }
    }

    /// Downgrade to fewer threads, or sequential, when `n_items` is small.
    #[inline]
    pub fn correct_for_workload(self, n_items: usize, min_items_per_thread: usize) -> Self {
        match self {
            Self::Sequential => Self::Sequential,
            Self::Parallel(n) => {
                let effective = n.min(n_items / min_items_per_thread.max(1)).max(1);
                if effective <= 1 {
                    Self::Sequential
                } else {
                    Self::Parallel(effective)
                }
            }
        }
    }

    /// Map `0..n` in order, fanning out over rayon when allowed.
    #[inline]
    pub fn maybe_par_map<B, F>(self, n: usize, f: F) -> Vec<B>
    where
        B: Send,
        F: Fn(usize) -> B + Sync + Send,
    {
        if self.allows_parallel() {
            (0..n).into_par_iter().map(f).collect()
        } else {
            (0..n).map(f).collect()
        }
    }
}

/// Run `f` under the thread pool implied by `n_threads`.
///
/// - `0` uses the ambient (global) rayon pool
/// - `1` runs sequentially on the calling thread
/// - `n > 1` installs a dedicated pool of `n` threads for the call
///
/// # Errors
///
/// Propagates a failure to spawn the dedicated pool.
pub fn run_with_threads<T: Send>(
    n_threads: usize,
    f: impl FnOnce(Parallelism) -> T + Send,
) -> Result<T, rayon::ThreadPoolBuildError> {
    let parallelism = Parallelism::from_threads(n_threads);
    if n_threads <= 1 {
        return Ok(f(parallelism));
    }
    let pool = rayon::ThreadPoolBuilder::new().num_threads(n_threads).build()?;
    Ok(pool.install(|| f(parallelism)))
}
