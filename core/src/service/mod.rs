pub mod dto;
pub mod task_collection;

#[cfg(test)]
mod task_collection_test;
