pub mod errors;
pub mod db;
pub mod image_type;
pub mod arch;
pub mod build_service;
pub mod token;
