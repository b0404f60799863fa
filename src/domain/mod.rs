pub mod error;
pub mod method;
pub mod models;
pub mod settings;
pub mod value;
