pub mod fanout;
pub mod frames;
pub mod server;
