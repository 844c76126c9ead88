// tests/integration/mod.rs

mod concurrency;
mod project_files;
