mod chat;
pub use chat::chat;
