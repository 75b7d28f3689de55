// Buffer related constants
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

// Batch related constants
pub const DEFAULT_MAX_WORKERS: usize = 8;

// Filesystem defaults
pub const DEFAULT_FS_ROOT: &str = "./storage";
pub const DEFAULT_FS_BUCKET: &str = "local";
