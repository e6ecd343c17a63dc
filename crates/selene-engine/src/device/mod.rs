//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain)
//! - owning the depth and multisample attachments that track the surface size
//! - acquiring frames and providing encoders/views for rendering

mod attachments;
mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use attachments::Attachments;
pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
