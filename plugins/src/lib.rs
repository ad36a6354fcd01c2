pub mod dashscope;
pub mod factory;
pub mod http;
