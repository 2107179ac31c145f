pub mod conversion;
pub mod editor;

pub use conversion::*;
pub use editor::*;
