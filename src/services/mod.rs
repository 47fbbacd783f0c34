pub mod image_provider;
pub mod uploads;
