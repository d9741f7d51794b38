use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::scan::handler::create_scan,
        crate::modules::scan::handler::get_job_status,
        crate::modules::scan::handler::get_job_result,
        crate::modules::scan::handler::get_job_info,
        crate::modules::scan::handler::get_stats,
    ),
    components(
        schemas(
            crate::modules::scan::dto::ScanRequest,
            crate::modules::scan::dto::ScanResponse,
            crate::modules::scan::dto::JobStatusResponse,
            crate::modules::scan::dto::JobResultResponse,
            crate::modules::scan::dto::JobInfoResponse,
            crate::modules::scan::dto::StatsResponse,
            crate::modules::scan::model::JobStatus,
        )
    ),
    tags(
        (name = "Scan", description = "3D scan job management")
    )
)]
pub struct ApiDoc;
