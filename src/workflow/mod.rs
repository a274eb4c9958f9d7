pub mod page_flow;

pub use page_flow::{PageFlow, PageProcessor};
