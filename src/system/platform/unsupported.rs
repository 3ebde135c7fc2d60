use super::PlatformExtensions;

pub struct Platform;

// No proc filesystem here; readers fall back to their defaults.
impl PlatformExtensions for Platform {
    fn clock_ticks_per_second() -> Option<u64> {
        None
    }

    fn page_size() -> Option<u64> {
        None
    }

    fn load_average_fixed() -> Option<[u64; 3]> {
        None
    }
}
