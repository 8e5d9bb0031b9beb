pub mod accumulate;
pub mod base;
pub mod chunk;
pub mod configs;
pub mod openai;
pub mod stream;

#[cfg(test)]
pub mod mock;
