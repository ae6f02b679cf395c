/// Texture module - descriptors, handles and the configurator

// Module declarations
pub mod texture_desc;
pub mod texture;
pub mod configurator;

pub use texture_desc::*;
pub use texture::*;
pub use configurator::*;
