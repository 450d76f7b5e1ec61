pub mod cloud_storage;
pub mod collection_observer;
pub mod db;

pub use collection_observer::CollectionObserver;
