// Transfer related constants
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;

// Listing page size, matching the provider's default page
pub const DEFAULT_PAGE_SIZE: usize = 100;

// Archives are unbounded in depth unless the caller asks otherwise
pub const UNBOUNDED_DEPTH: u32 = u32::MAX;

// Filesystem default
pub const DEFAULT_FS_ROOT: &str = "./storage";

// Archive name used when the folder has no name of its own (the storage root)
pub const ROOT_ARCHIVE_NAME: &str = "root";
