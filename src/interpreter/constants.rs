// Constants for the tape interpreter

/// Number of cells on the tape. The pointer is valid in `[0, TAPE_SIZE)`.
pub const TAPE_SIZE: usize = 3000;

/// Default memory budget for the snapshot history (256 MB)
pub const DEFAULT_SNAPSHOT_LIMIT: usize = 256 * 1024 * 1024;
