pub mod library_service;
pub mod ocr_service;
pub mod translation_service;

pub use library_service::LibraryService;
pub use ocr_service::OcrService;
pub use translation_service::TranslationService;
