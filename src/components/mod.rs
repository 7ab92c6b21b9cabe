//! UI Components
//!
//! Screens and the small pieces they share.

mod categories_page;
mod receipts_page;
mod scanner_page;
mod status_banner;

pub use categories_page::CategoriesPage;
pub use receipts_page::ReceiptsPage;
pub use scanner_page::ScannerPage;
pub use status_banner::StatusBanner;
