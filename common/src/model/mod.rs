pub mod role;
pub mod template;
