pub mod error;
pub mod fetch;
pub mod font_source;

pub use error::{CommonError, CommonResult};
pub use fetch::{AssetSource, HttpAssetSource, MemoryAssetSource};
pub use font_source::FontSource;
