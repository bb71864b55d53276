mod translate;

pub use translate::{TranslateToOrigin, DEFAULT_PADDING};
