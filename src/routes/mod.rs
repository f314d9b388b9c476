pub mod pages;
pub mod submit;
