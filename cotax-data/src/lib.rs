mod bundle;
mod loader;

pub use bundle::{BundleError, FormDataBundle};
pub use loader::{RateLoaderError, RateScheduleLoader, RateScheduleRecord};
