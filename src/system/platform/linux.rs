use super::PlatformExtensions;

pub struct Platform;

fn sysconf(name: libc::c_int) -> Option<u64> {
    // SAFETY: sysconf has no memory-safety preconditions.
    let value = unsafe { libc::sysconf(name) };
    if value > 0 { Some(value as u64) } else { None }
}

impl PlatformExtensions for Platform {
    fn clock_ticks_per_second() -> Option<u64> {
        sysconf(libc::_SC_CLK_TCK)
    }

    fn page_size() -> Option<u64> {
        sysconf(libc::_SC_PAGESIZE)
    }

    fn load_average_fixed() -> Option<[u64; 3]> {
        // SAFETY: sysinfo only writes into the zeroed struct we own.
        let mut info = unsafe { std::mem::zeroed::<libc::sysinfo>() };
        let rc = unsafe { libc::sysinfo(&mut info) };
        if rc != 0 {
            return None;
        }
        Some([
            info.loads[0] as u64,
            info.loads[1] as u64,
            info.loads[2] as u64,
        ])
    }
}
