pub mod ai_models;
pub mod batch;
pub mod book;
pub mod category;
pub mod edit_request;
pub mod job;
pub mod loaders;
pub mod page;
pub mod tenant;
pub mod user;

pub use batch::{
    BatchOutcome, BatchSettings, OverallStatus, PageProcessingStatus, ProcessingResults, Stage,
    StageErrorEntry, StageStatus,
};
pub use book::{Book, BookDetails, BookForm, FeaturedPage, NextPageNumber};
pub use category::{Category, CategoryForm};
pub use edit_request::{EditRequest, EditRequestUpdate, RequestStatus, RequestType};
pub use job::BatchJob;
pub use loaders::load_job_from_toml;
pub use page::{OcrTranslation, Page, PageForm};
pub use tenant::{
    EntityStatus, PlanName, RoleName, Tenant, TenantBrandingConfig, TenantCreate, TenantSettings,
    TenantSummary, TenantUpdate,
};
pub use user::{TokenResponse, UserCreate, UserPermissions, UserSummary, UserUpdate};
