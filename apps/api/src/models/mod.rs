pub mod conversation;
pub mod cv;
