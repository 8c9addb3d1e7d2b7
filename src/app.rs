use crate::auth::require_identity;
use crate::handlers::{
    auth, contact, education, hobbies, projects, resumes, skills, testimonials, upload,
    work_experience,
};
use crate::middleware::{
    cors_layer, health_check, request_id_layer, root, trace_layer, validate_request_size,
};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post, put},
    Router,
};
use tower::ServiceBuilder;

/// Build the application router
pub fn create_app(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/", get(root))
        .route("/api/health", get(health_check))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/skills", get(skills::list_skills))
        .route("/api/skills/:id", get(skills::get_skill))
        .route("/api/projects", get(projects::list_projects))
        .route("/api/projects/featured", get(projects::list_featured_projects))
        .route("/api/projects/:id", get(projects::get_project))
        .route("/api/work-experience", get(work_experience::list_work_experience))
        .route("/api/work-experience/:id", get(work_experience::get_work_experience))
        .route("/api/education", get(education::list_education))
        .route("/api/education/:id", get(education::get_education))
        .route("/api/contact/send", post(contact::send_message))
        .route("/api/testimonials", get(testimonials::list_testimonials))
        .route("/api/testimonials/submit", post(testimonials::submit_testimonial))
        .route("/api/testimonials/:id", get(testimonials::get_testimonial))
        .route("/api/hobbies", get(hobbies::list_hobbies))
        .route("/api/hobbies/:id", get(hobbies::get_hobby))
        .route("/api/resumes", get(resumes::list_resumes))
        .route("/api/resumes/active/:language", get(resumes::get_active_resume))
        .route("/api/resumes/:id", get(resumes::get_resume));

    // Admin routes (bearer token required)
    let protected_routes = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route("/api/upload", post(upload::upload_file))
        .route("/api/upload/*path", delete(upload::delete_file))
        .route("/api/skills/all", get(skills::list_all_skills))
        .route("/api/skills", post(skills::create_skill))
        .route(
            "/api/skills/:id",
            put(skills::update_skill).delete(skills::delete_skill),
        )
        .route("/api/projects", post(projects::create_project))
        .route(
            "/api/projects/:id",
            put(projects::update_project).delete(projects::delete_project),
        )
        .route("/api/work-experience", post(work_experience::create_work_experience))
        .route(
            "/api/work-experience/:id",
            put(work_experience::update_work_experience)
                .delete(work_experience::delete_work_experience),
        )
        .route("/api/education", post(education::create_education))
        .route(
            "/api/education/:id",
            put(education::update_education).delete(education::delete_education),
        )
        .route("/api/contact", get(contact::list_messages))
        .route(
            "/api/contact/:id",
            get(contact::get_message).delete(contact::delete_message),
        )
        .route("/api/contact/:id/read", patch(contact::mark_as_read))
        .route("/api/testimonials", post(testimonials::create_testimonial))
        .route("/api/testimonials/admin/all", get(testimonials::list_all_testimonials))
        .route(
            "/api/testimonials/:id",
            put(testimonials::update_testimonial).delete(testimonials::delete_testimonial),
        )
        .route("/api/testimonials/:id/approve", put(testimonials::approve_testimonial))
        .route("/api/testimonials/:id/reject", put(testimonials::reject_testimonial))
        .route("/api/hobbies", post(hobbies::create_hobby))
        .route(
            "/api/hobbies/:id",
            put(hobbies::update_hobby).delete(hobbies::delete_hobby),
        )
        .route("/api/resumes", post(resumes::create_resume))
        .route(
            "/api/resumes/:id",
            put(resumes::update_resume).delete(resumes::delete_resume),
        )
        .route_layer(from_fn_with_state(state.verifier.clone(), require_identity));

    let body_limit = usize::try_from(state.config.upload.body_limit()).unwrap_or(usize::MAX);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(trace_layer())
                .layer(request_id_layer())
                .layer(cors_layer(&state.config))
                .layer(from_fn_with_state(
                    state.config.clone(),
                    validate_request_size,
                ))
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}
