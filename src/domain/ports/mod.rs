mod control_plane;

pub use control_plane::{ControlPlane, RemoteError};
