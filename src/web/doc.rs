use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Flood Adventure", description = "Drive level runs of the Flood Adventure game"),
    paths(
        crate::web::routes::levels::levels_list_handler,
        crate::web::routes::levels::levels_get_handler,
        crate::web::routes::runs::runs_create_handler,
        crate::web::routes::runs::runs_get_handler,
        crate::web::routes::runs::runs_delete_handler,
        crate::web::routes::runs::runs_start_handler,
        crate::web::routes::runs::runs_segment_end_handler,
        crate::web::routes::runs::runs_playback_handler,
        crate::web::routes::runs::runs_click_target_handler,
        crate::web::routes::runs::runs_answer_handler,
        crate::web::routes::runs::runs_quiz_restart_handler,
        crate::web::routes::runs::runs_continue_handler,
    ),
    tags(
        (name = "levels", description = "Level catalog and campaign progress"),
        (name = "runs", description = "In-memory play-throughs of a level"),
    ),
)]
pub struct ApiDoc;
