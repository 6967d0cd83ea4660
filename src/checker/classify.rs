use crate::job::LinkStatus;

/// Classifies an HTTP status code
///
/// 2xx and 3xx are alive. 401 and 403 are also alive: the resource exists
/// but access is restricted. Everything else is dead.
///
/// # Examples
///
/// ```
/// use link_sonar::{classify_status, LinkStatus};
///
/// assert_eq!(classify_status(200), LinkStatus::Alive);
/// assert_eq!(classify_status(403), LinkStatus::Alive);
/// assert_eq!(classify_status(404), LinkStatus::Dead);
/// ```
pub fn classify_status(status_code: u16) -> LinkStatus {
    match status_code {
        200..=399 | 401 | 403 => LinkStatus::Alive,
        _ => LinkStatus::Dead,
    }
}
