/// Media file persistence behind a storage trait.
pub mod media_store;
/// Storage error types shared by store implementations.
pub mod storage;
