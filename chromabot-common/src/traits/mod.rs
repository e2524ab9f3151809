pub mod chat_traits;

pub use chat_traits::ChatHandler;
