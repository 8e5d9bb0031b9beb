pub mod catalog;
pub mod executor;

#[cfg(test)]
pub mod mock;
