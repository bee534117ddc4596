pub mod histogram;
pub mod product;
pub mod upload;
