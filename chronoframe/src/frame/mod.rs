pub mod macros;
pub mod members;
pub mod resample;
pub mod table;
pub mod util;
