mod handlers;
mod types;

pub use handlers::{create_report, delete_report, get_report, list_reports, update_report};
pub use types::{CreateReportRequest, ReportResponse, UpdateReportRequest};

// Re-export utoipa path structs for OpenAPI documentation
pub use handlers::{
    __path_create_report, __path_delete_report, __path_get_report, __path_list_reports,
    __path_update_report,
};
