pub mod info_routes;
pub mod map_routes;
