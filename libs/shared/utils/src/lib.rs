pub mod params;
pub mod test_utils;
