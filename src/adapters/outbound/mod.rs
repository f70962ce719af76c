mod http_control_plane;

pub use http_control_plane::HttpControlPlane;
