//! Process and host information for the run banner

use chrono::{DateTime, Local};

#[derive(Debug, Clone)]
pub struct SystemInfo {
    pub user: String,
    pub uid: Option<u32>,
    pub host: String,
    pub pid: u32,
    pub started_at: DateTime<Local>,
}

impl SystemInfo {
    pub fn collect() -> Self {
        Self {
            user: user_name(),
            uid: user_id(),
            host: host_name().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            started_at: Local::now(),
        }
    }
}

fn user_name() -> String {
    ["USER", "USERNAME", "LOGNAME"]
        .iter()
        .find_map(|key| std::env::var(key).ok().filter(|name| !name.is_empty()))
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(unix)]
fn user_id() -> Option<u32> {
    // SAFETY: getuid has no preconditions and cannot fail
    Some(unsafe { libc::getuid() })
}

#[cfg(not(unix))]
fn user_id() -> Option<u32> {
    None
}

#[cfg(unix)]
fn host_name() -> Option<String> {
    let mut buffer = [0u8; 256];
    // SAFETY: the pointer and length describe a writable buffer we own
    let rc = unsafe { libc::gethostname(buffer.as_mut_ptr().cast(), buffer.len()) };
    if rc != 0 {
        return None;
    }
    let end = buffer.iter().position(|&b| b == 0).unwrap_or(buffer.len());
    let name = String::from_utf8_lossy(&buffer[..end]).into_owned();
    (!name.is_empty()).then_some(name)
}

#[cfg(not(unix))]
fn host_name() -> Option<String> {
    std::env::var("COMPUTERNAME").ok()
}

/// Wall-clock time in the banner format
pub fn format_time(time: &DateTime<Local>) -> String {
    time.format("%a %b %e %H:%M:%S %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_fills_every_field() {
        let info = SystemInfo::collect();

        assert!(!info.user.is_empty());
        assert!(!info.host.is_empty());
        assert_eq!(info.pid, std::process::id());
    }

    #[test]
    fn test_format_time() {
        use chrono::TimeZone;

        let time = Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
        assert_eq!(format_time(&time), "Tue Mar  5 14:07:09 2024");
    }
}
