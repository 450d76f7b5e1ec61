pub mod cloud_storage;
pub mod db;
pub mod observer;
