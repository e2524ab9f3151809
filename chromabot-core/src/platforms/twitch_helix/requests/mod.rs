pub mod chat_color;
