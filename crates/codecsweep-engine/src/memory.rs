//! Per-thread allocation tracking
//!
//! [`TrackingAllocator`] wraps the system allocator and keeps, for every
//! thread, the bytes currently allocated by that thread and the high-water
//! mark of that value. A [`MemoryTrace`] resets the high-water mark on entry
//! and reports the peak above its baseline, so a buffer that is allocated and
//! freed inside the window still counts.
//!
//! The counters only move when a binary installs the allocator:
//!
//! ```rust,ignore
//! #[global_allocator]
//! static GLOBAL: codecsweep_engine::TrackingAllocator = codecsweep_engine::TrackingAllocator::new();
//! ```

#![allow(unsafe_code)]

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};

thread_local! {
    // Signed: memory freed on a thread other than the one that allocated it
    // drives that thread's counter below zero.
    static CURRENT: Cell<isize> = const { Cell::new(0) };
    static PEAK: Cell<isize> = const { Cell::new(0) };
}

static INSTALLED: AtomicBool = AtomicBool::new(false);

fn record_alloc(size: usize) {
    if !INSTALLED.load(Ordering::Relaxed) {
        INSTALLED.store(true, Ordering::Relaxed);
    }
    let _ = CURRENT.try_with(|current| {
        let now = current.get().wrapping_add(size as isize);
        current.set(now);
        let _ = PEAK.try_with(|peak| {
            if now > peak.get() {
                peak.set(now);
            }
        });
    });
}

fn record_dealloc(size: usize) {
    let _ = CURRENT.try_with(|current| current.set(current.get().wrapping_sub(size as isize)));
}

fn record_realloc(old_size: usize, new_size: usize, in_place: bool) {
    if in_place {
        if new_size >= old_size {
            record_alloc(new_size - old_size);
        } else {
            record_dealloc(old_size - new_size);
        }
    } else {
        // Both blocks are live while the contents move.
        record_alloc(new_size);
        record_dealloc(old_size);
    }
}

fn current() -> isize {
    CURRENT.try_with(Cell::get).unwrap_or(0)
}

fn peak() -> isize {
    PEAK.try_with(Cell::get).unwrap_or(0)
}

fn set_peak(value: isize) {
    let _ = PEAK.try_with(|peak| peak.set(value));
}

/// Whether a [`TrackingAllocator`] is serving allocations in this process
pub fn is_installed() -> bool {
    INSTALLED.load(Ordering::Relaxed)
}

/// System allocator wrapper that counts bytes per thread
#[derive(Debug, Default, Clone, Copy)]
pub struct TrackingAllocator;

impl TrackingAllocator {
    /// Create the allocator; usable in a `static`
    pub const fn new() -> Self {
        Self
    }
}

// SAFETY: every call is forwarded unchanged to `System`; the bookkeeping only
// touches const-initialized thread locals, which never allocate.
unsafe impl GlobalAlloc for TrackingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc_zeroed(layout);
        if !ptr.is_null() {
            record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        record_dealloc(layout.size());
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = System.realloc(ptr, layout, new_size);
        if !new_ptr.is_null() {
            record_realloc(layout.size(), new_size, new_ptr == ptr);
        }
        new_ptr
    }
}

/// Scoped peak-memory measurement on the current thread
///
/// Dropping the trace folds its peak back into any enclosing trace, so
/// traces nest. The guard is tied to the thread that created it.
#[derive(Debug)]
pub struct MemoryTrace {
    baseline: isize,
    outer_peak: isize,
    _thread_bound: PhantomData<*const ()>,
}

impl MemoryTrace {
    /// Start tracing from the current allocation level
    pub fn start() -> Self {
        let baseline = current();
        let outer_peak = peak();
        set_peak(baseline);
        Self {
            baseline,
            outer_peak,
            _thread_bound: PhantomData,
        }
    }

    /// Highest number of bytes held above the baseline since `start`
    pub fn peak_bytes(&self) -> u64 {
        peak().saturating_sub(self.baseline).max(0) as u64
    }

    /// Bytes held above the baseline right now
    pub fn current_bytes(&self) -> i64 {
        current().saturating_sub(self.baseline) as i64
    }
}

impl Drop for MemoryTrace {
    fn drop(&mut self) {
        set_peak(self.outer_peak.max(peak()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::hint::black_box;

    const MB: usize = 1024 * 1024;

    #[test]
    fn test_allocator_is_installed_for_tests() {
        let _buffer = black_box(vec![0u8; 64]);
        assert!(is_installed());
    }

    #[test]
    fn test_transient_allocation_counts_towards_peak() {
        let trace = MemoryTrace::start();
        {
            let buffer = black_box(vec![1u8; 4 * MB]);
            drop(buffer);
        }
        let small = black_box(vec![1u8; 1024]);

        assert!(trace.peak_bytes() >= (4 * MB) as u64);
        assert!(trace.current_bytes() < MB as i64);
        drop(small);
    }

    #[test]
    fn test_nested_trace_reports_to_outer() {
        let outer = MemoryTrace::start();
        {
            let inner = MemoryTrace::start();
            let buffer = black_box(vec![1u8; 2 * MB]);
            assert!(inner.peak_bytes() >= (2 * MB) as u64);
            drop(buffer);
        }
        assert!(outer.peak_bytes() >= (2 * MB) as u64);
    }

    #[test]
    fn test_fresh_trace_ignores_earlier_peaks() {
        {
            let _earlier = black_box(vec![1u8; 8 * MB]);
        }
        let trace = MemoryTrace::start();
        assert!(trace.peak_bytes() < MB as u64);
    }

    #[test]
    fn test_in_place_realloc_counts_only_the_growth() {
        let trace = MemoryTrace::start();
        record_realloc(1000, 1500, true);
        assert_eq!(trace.peak_bytes(), 500);
        record_realloc(1500, 1000, true);
        assert_eq!(trace.current_bytes(), 0);
        assert_eq!(trace.peak_bytes(), 500);
    }

    #[test]
    fn test_moving_realloc_holds_both_blocks() {
        let trace = MemoryTrace::start();
        record_realloc(1000, 1500, false);
        assert_eq!(trace.peak_bytes(), 1500);
        assert_eq!(trace.current_bytes(), 500);
        record_realloc(1500, 1000, false);
        assert_eq!(trace.current_bytes(), 0);
    }

    #[test]
    fn test_other_threads_do_not_contaminate() {
        let trace = MemoryTrace::start();
        std::thread::spawn(|| {
            let _buffer = black_box(vec![1u8; 16 * MB]);
        })
        .join()
        .unwrap();

        assert!(trace.peak_bytes() < (16 * MB) as u64);
    }
}
