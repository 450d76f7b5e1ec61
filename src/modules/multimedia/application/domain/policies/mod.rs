pub mod gallery_policy;
