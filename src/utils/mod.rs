pub mod storage;
pub mod types;
pub mod value;
