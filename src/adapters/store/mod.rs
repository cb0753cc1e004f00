mod file;
mod memory;

pub use file::JsonFileServiceStore;
pub use memory::InMemoryServiceStore;
