/// Placeholder tokens have the fixed form `<base64-N>`, N in 1..=9.
pub const TOKEN_PREFIX: &str = "<base64-";
pub const TOKEN_SUFFIX: &str = ">";

/// Highest placeholder index the template scanner looks for.
pub const MAX_PLACEHOLDERS: usize = 9;

/// Byte size units used by the transfer buffer tiers.
pub const KB: usize = 1024;
pub const MB: u64 = 1024 * 1024;
pub const GB: u64 = 1024 * MB;

/// Transfer buffer tiers.
/// - below 1 MiB        → DEFAULT_BUFFER_SIZE
/// - 1 MiB up to 1 GiB  → MEDIUM_BUFFER_SIZE
/// - 1 GiB and above    → LARGE_BUFFER_SIZE
pub const DEFAULT_BUFFER_SIZE: usize = 8 * KB;
pub const MEDIUM_BUFFER_SIZE: usize = 32 * KB;
pub const LARGE_BUFFER_SIZE: usize = 64 * KB;

/// Chunk size used when a reader is turned into a chunk sequence
/// and the caller did not ask for anything specific.
pub const DEFAULT_READ_CHUNK_SIZE: usize = DEFAULT_BUFFER_SIZE;

/// Upper sanity bound for a single read chunk (32 MiB).
pub const MAX_READ_CHUNK_SIZE: usize = 32 * 1024 * 1024;
