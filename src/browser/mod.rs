//! Live page loading over WebDriver.

pub mod page;
pub mod session;

pub use page::WebDriverPage;
