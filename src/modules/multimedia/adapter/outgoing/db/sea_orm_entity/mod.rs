pub mod media_items;
