pub mod extract_images;
pub mod health;
pub mod image_get;
pub mod image_list;
