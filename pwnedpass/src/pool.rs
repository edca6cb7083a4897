use std::sync::Mutex;

/// Initial scratch buffer size. The longest run in the current corpus fits
/// comfortably in 8 KiB; a longer run grows its buffer on demand and the
/// grown buffer is what returns to the pool.
const SCRATCH_SIZE: usize = 8 << 10;

/// Buffers retained for reuse; anything returned beyond this is dropped.
const MAX_POOLED: usize = 16;

/// Free list of scratch buffers shared by concurrent scans.
///
/// Each scan takes one buffer for its lifetime and returns it on completion,
/// so back-to-back scans allocate nothing.
pub(crate) struct BufferPool {
    free: Mutex<Vec<Vec<u8>>>,
}

impl BufferPool {
    pub fn new() -> Self {
        Self {
            free: Mutex::new(Vec::new()),
        }
    }

    /// Takes a buffer from the pool, or allocates a fresh one.
    pub fn get(&self) -> Vec<u8> {
        self.free
            .lock()
            .ok()
            .and_then(|mut free| free.pop())
            .unwrap_or_else(|| vec![0; SCRATCH_SIZE])
    }

    /// Returns a buffer to the pool for the next scan.
    pub fn put(&self, buf: Vec<u8>) {
        if let Ok(mut free) = self.free.lock() {
            if free.len() < MAX_POOLED {
                free.push(buf);
            }
        }
    }
}
