pub mod batch;
pub mod collection;
pub mod entities;
pub mod policies;
