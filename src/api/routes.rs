//! API route configuration.

use axum::Router;
use axum::routing::{delete, get, post, put};

use super::handlers;
use super::state::AppState;
use crate::db::Database;

/// Build routes with generic database type.
///
/// Registers handlers that are generic over the Database trait, applying the
/// turbofish automatically.
macro_rules! routes {
    ($D:ty => {
        $($method:ident $path:literal => $($handler:ident)::+),* $(,)?
    }) => {{
        let router = Router::new();
        $(
            let router = router.route($path, $method($($handler)::+::<$D>));
        )*
        router
    }};
}

/// Create the API router.
pub fn create_router<D: Database>(state: AppState<D>) -> Router {
    let system_routes = routes!(D => {
        get "/health" => handlers::health,
    });

    let data_routes = routes!(D => {
        get "/api/data" => handlers::get_data,
        get "/api/drivers" => handlers::list_drivers,
        get "/api/totals" => handlers::get_totals,
    });

    let entry_routes = routes!(D => {
        get "/api/entries" => handlers::list_entries,
        put "/api/entries" => handlers::upsert_entry,
        get "/api/entries/{driver}" => handlers::driver_entries,
        delete "/api/entries/{driver}" => handlers::delete_driver_entries,
        delete "/api/entries/{driver}/{month}" => handlers::delete_entry,
    });

    let registry_routes = routes!(D => {
        get "/api/registry/drivers" => handlers::list_registered_drivers,
        post "/api/registry/drivers" => handlers::create_driver,
        put "/api/registry/drivers/{id}" => handlers::update_driver,
        delete "/api/registry/drivers/{id}" => handlers::delete_driver,
        post "/api/registry/drivers/bulk-delete" => handlers::bulk_delete_drivers,
    });

    system_routes
        .merge(data_routes)
        .merge(entry_routes)
        .merge(registry_routes)
        .with_state(state)
}
