mod handlers;
mod types;

pub use handlers::{
    create_user_report, delete_user_report, get_user_report, list_user_reports, toggle_like,
    update_user_report,
};
pub use types::{
    resolve_source, CreateUserReportRequest, LikeRequest, OwnerQuery, UpdateUserReportRequest,
    UserReportResponse, UserReportsQuery, ViewerQuery, DEFAULT_SOURCE,
};

// Re-export utoipa path structs for OpenAPI documentation
pub use handlers::{
    __path_create_user_report, __path_delete_user_report, __path_get_user_report,
    __path_list_user_reports, __path_toggle_like, __path_update_user_report,
};
