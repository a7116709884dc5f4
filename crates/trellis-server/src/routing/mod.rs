//! Route paths and the route table

pub mod path;
pub mod table;

pub use path::{PathPattern, cut_route_path, join_route_path};
pub use table::{BoundRoute, ControllerRoutes, RouteTable};
