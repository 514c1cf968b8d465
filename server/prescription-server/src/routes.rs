use crate::handlers::{health, pharmacists, prescriptions};
use crate::server::PrescriptionServer;
use axum::{
    routing::{delete, get, post, put},
    Router,
};

/// Route paths. Casing is what deployed clients already call.
pub mod paths {
    pub const HEALTH: &str = "/health";

    pub const REGISTER_PHARMACIST: &str = "/RegisterPharmacist";
    pub const UPDATE_PROFILE: &str = "/UpdateProfile";
    pub const LOGIN_PHARMACIST: &str = "/api/Handler/LoginPharmacist";

    pub const ADD_PRESCRIPTION: &str = "/api/Handler/AddPrescription";
    pub const GET_PRESCRIPTIONS: &str = "/api/Handler/GetPrescriptions/:pharmacist_id";
    pub const DELETE_PRESCRIPTION: &str = "/api/Handler/DeletePrescription/:id";
}

/// Create health check routes
pub fn health_routes() -> Router<PrescriptionServer> {
    Router::new().route(paths::HEALTH, get(health::health_check))
}

/// Create pharmacist account routes
pub fn pharmacist_routes() -> Router<PrescriptionServer> {
    Router::new()
        .route(paths::REGISTER_PHARMACIST, post(pharmacists::register_pharmacist))
        .route(paths::LOGIN_PHARMACIST, post(pharmacists::login_pharmacist))
        .route(paths::UPDATE_PROFILE, put(pharmacists::update_profile))
}

/// Create prescription routes
pub fn prescription_routes() -> Router<PrescriptionServer> {
    Router::new()
        .route(paths::ADD_PRESCRIPTION, post(prescriptions::add_prescription))
        .route(paths::GET_PRESCRIPTIONS, get(prescriptions::get_prescriptions))
        .route(paths::DELETE_PRESCRIPTION, delete(prescriptions::delete_prescription))
}

pub fn create_routes() -> Router<PrescriptionServer> {
    Router::new()
        .merge(health_routes())
        .merge(pharmacist_routes())
        .merge(prescription_routes())
}
