pub mod core;
pub mod dom;
pub mod jobs;
pub mod page;
pub mod server;
pub mod storage;

#[cfg(test)]
pub(crate) mod testing;
