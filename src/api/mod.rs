pub mod files;
pub mod health;
pub mod hero_slides;
pub mod projects;
pub mod response;
