pub mod api_client;

pub use api_client::{
    ApiClient, OcrResponse, OcrRunParams, TranslationResponse, TranslationRunParams,
};
