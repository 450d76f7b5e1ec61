pub mod multimedia;
