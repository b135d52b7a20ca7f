pub mod mask;

pub use mask::{mask_email, mask_sensitive};
