pub mod files;
pub mod format;
pub mod mapping;
pub mod tag;
