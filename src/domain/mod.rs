mod announcement;
mod country;
mod langcode;
mod recipient;

pub use announcement::*;
pub use country::*;
pub use langcode::*;
pub use recipient::*;
