#![forbid(unsafe_code)]

pub mod repository;

pub use repository::{
    CourseRepository, InMemoryRepository, ProgressStore, Storage, StorageError,
};
