//! Asset types (virtual currency denominations)

pub mod models;
pub mod registry;

pub use models::AssetType;
pub use registry::AssetRegistry;
