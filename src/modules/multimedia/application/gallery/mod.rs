pub mod gallery_session;
pub mod lightbox;
pub mod order_manager;

pub use gallery_session::{
    GalleryError, GallerySession, UploadAffordance, UploadDisabledReason,
};
pub use lightbox::{Lightbox, ViewerKey};
pub use order_manager::OrderManager;
