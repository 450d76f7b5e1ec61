pub mod media_collection_repository_postgres;
pub mod sea_orm_entity;
