pub mod chart_renderer;
pub mod product_scraper;
pub mod spreadsheet;
pub mod text_recognizer;

pub use chart_renderer::*;
pub use product_scraper::*;
pub use spreadsheet::*;
pub use text_recognizer::*;
