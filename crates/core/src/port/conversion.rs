// Conversion Type Port (Interface)

use super::platform::Platform;
use crate::domain::error::Result;
use crate::domain::{DateTimeValue, Value};

/// Bidirectional conversion between application values and their storage
/// representation on a given platform.
pub trait ConversionType: Send + Sync {
    /// Identifier reported in conversion errors
    fn name(&self) -> &str;

    /// Application value -> storage representation
    fn to_storage(&self, value: Value, platform: &dyn Platform) -> Result<Value>;

    /// Storage representation -> application value (`None` for SQL NULL)
    fn from_storage(&self, value: Value, platform: &dyn Platform)
        -> Result<Option<DateTimeValue>>;
}
