//! Stack growth for deeply recursive programs.
//!
//! Every interpreted call nests several evaluator frames, so the call-depth
//! limit alone does not keep the host stack from running out. The recursive
//! entry points run through `ensure_sufficient_stack`, which moves onto a
//! fresh heap-allocated segment when the current one runs low.

/// Run `f`, growing the stack first if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    /// Minimum stack space to keep available (100KB red zone).
    const RED_ZONE: usize = 100 * 1024;

    /// Size of each new segment (1MB).
    const STACK_PER_RECURSION: usize = 1024 * 1024;

    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
