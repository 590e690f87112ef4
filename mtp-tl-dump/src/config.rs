//! Dumper settings.

/// Tunables for [`crate::TextDumper`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DumpConfig {
    /// How many `gzip_packed` layers are inflated inside each other.
    pub max_gzip_depth: usize,
    /// Bytes shown before `...` for long binary strings.
    pub bytes_preview: usize,
    /// Binary strings at least this long are truncated to the preview.
    pub long_bytes_threshold: usize,
    /// Nesting level beyond which indentation stops growing.
    pub max_indent: usize,
    /// Largest inflated size of one `gzip_packed` payload, in bytes.
    pub max_inflated_bytes: usize,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            max_gzip_depth: 4,
            bytes_preview: 16,
            long_bytes_threshold: 64,
            max_indent: 64,
            max_inflated_bytes: 16 * 1024 * 1024,
        }
    }
}
