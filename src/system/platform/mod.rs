/// Kernel values that are not exposed as proc files and need a syscall.
pub trait PlatformExtensions {
    fn clock_ticks_per_second() -> Option<u64>;
    fn page_size() -> Option<u64>;
    /// Load averages in the kernel's 16.16 fixed-point encoding.
    fn load_average_fixed() -> Option<[u64; 3]>;
}

#[cfg(target_os = "linux")]
mod linux;
#[cfg(not(target_os = "linux"))]
mod unsupported;

#[cfg(target_os = "linux")]
use linux as platform_impl;
#[cfg(not(target_os = "linux"))]
use unsupported as platform_impl;

pub const DEFAULT_CLOCK_TICKS: u64 = 100;
pub const DEFAULT_PAGE_SIZE: u64 = 4096;

pub fn clock_ticks_per_second() -> u64 {
    platform_impl::Platform::clock_ticks_per_second().unwrap_or(DEFAULT_CLOCK_TICKS)
}

pub fn page_size() -> u64 {
    platform_impl::Platform::page_size().unwrap_or(DEFAULT_PAGE_SIZE)
}

pub fn load_average_fixed() -> Option<[u64; 3]> {
    platform_impl::Platform::load_average_fixed()
}
