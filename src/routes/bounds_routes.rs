use axum::{Router, routing::any};
use crate::{AppState, controllers::bounds_controller};

// `any` so that non-POST requests reach the handler and get the 400 it sends.
pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/setUpperPriceBound", any(bounds_controller::set_upper_price_bound))
        .route("/setLowerPriceBound", any(bounds_controller::set_lower_price_bound))
        .route("/setAlertsEnabled", any(bounds_controller::set_alerts_enabled))
}
