pub mod bus;
pub mod core;
pub mod gpu3d;

pub mod prelude {
    pub use crate::bus::{Bus, FirmwareError, Processor};
    pub use crate::core::Component;
    pub use crate::gpu3d::{Polygon, Rasterizer, Vertex};
}
