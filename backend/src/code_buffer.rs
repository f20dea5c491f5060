use std::io;
use std::ptr;

/// Default code buffer size: 4 MiB.
const DEFAULT_CODE_BUF_SIZE: usize = 4 * 1024 * 1024;

/// Size of one host instruction word.
pub const INSN_SIZE: usize = 4;

/// JIT code buffer backed by mmap'd memory.
///
/// Holds big-endian 32-bit host instruction words, appended in order by
/// the encoder.
pub struct CodeBuffer {
    ptr: *mut u8,
    size: usize,
    offset: usize,
}

// SAFETY: CodeBuffer owns its mmap'd memory exclusively.
unsafe impl Send for CodeBuffer {}

impl CodeBuffer {
    /// Allocate a new code buffer of the given size (rounded up to page size).
    pub fn new(size: usize) -> io::Result<Self> {
        let page_size = page_size();
        let size = (size + page_size - 1) & !(page_size - 1);

        // SAFETY: mmap with MAP_ANONYMOUS | MAP_PRIVATE, no file backing.
        let ptr = unsafe {
            libc::mmap(
                ptr::null_mut(),
                size,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                -1,
                0,
            )
        };

        if ptr == libc::MAP_FAILED {
            return Err(io::Error::last_os_error());
        }

        Ok(Self {
            ptr: ptr as *mut u8,
            size,
            offset: 0,
        })
    }

    /// Allocate with the default size (4 MiB).
    pub fn with_default_size() -> io::Result<Self> {
        Self::new(DEFAULT_CODE_BUF_SIZE)
    }

    /// Current write offset in bytes.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Total capacity in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.size
    }

    /// Remaining writable bytes.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.size - self.offset
    }

    /// Raw pointer to the start of the buffer.
    #[inline]
    pub fn base_ptr(&self) -> *const u8 {
        self.ptr as *const u8
    }

    /// Number of instruction words written so far.
    #[inline]
    pub fn insn_count(&self) -> usize {
        self.offset / INSN_SIZE
    }

    /// Append one instruction word, big-endian.
    #[inline]
    pub fn emit_insn(&mut self, insn: u32) {
        assert!(self.offset + INSN_SIZE <= self.size, "code buffer overflow");
        let bytes = insn.to_be_bytes();
        // SAFETY: bounds checked above.
        unsafe {
            ptr::copy_nonoverlapping(
                bytes.as_ptr(),
                self.ptr.add(self.offset),
                INSN_SIZE,
            );
        }
        self.offset += INSN_SIZE;
    }

    /// Read back the instruction word at byte `offset`.
    #[inline]
    pub fn read_insn(&self, offset: usize) -> u32 {
        assert!(offset + INSN_SIZE <= self.offset);
        let s = self.as_slice();
        u32::from_be_bytes([s[offset], s[offset + 1], s[offset + 2], s[offset + 3]])
    }

    /// Iterate over the instruction words written so far.
    pub fn insns(&self) -> impl Iterator<Item = u32> + '_ {
        self.as_slice()
            .chunks_exact(INSN_SIZE)
            .map(|w| u32::from_be_bytes([w[0], w[1], w[2], w[3]]))
    }

    /// Get the generated code as a byte slice (up to current offset).
    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: ptr..ptr+offset has been written.
        unsafe { std::slice::from_raw_parts(self.ptr, self.offset) }
    }
}

impl Drop for CodeBuffer {
    fn drop(&mut self) {
        if !self.ptr.is_null() {
            unsafe {
                libc::munmap(self.ptr as *mut libc::c_void, self.size);
            }
        }
    }
}

fn page_size() -> usize {
    // SAFETY: sysconf is always safe to call.
    unsafe { libc::sysconf(libc::_SC_PAGESIZE) as usize }
}
