use chrono::{Local, NaiveDateTime};

/// Backup file name for a dump taken at `at`.
///
/// ```
/// use chrono::NaiveDate;
/// use pypln_deploy::backup::backup_filename;
///
/// let at = NaiveDate::from_ymd_opt(2013, 4, 2)
///     .unwrap()
///     .and_hms_opt(17, 5, 9)
///     .unwrap();
/// assert_eq!(backup_filename("pypln", at), "pypln_2013-04-02_17-05-09.backup");
/// ```
#[must_use]
pub fn backup_filename(prefix: &str, at: NaiveDateTime) -> String {
    format!("{prefix}_{}.backup", at.format("%Y-%m-%d_%H-%M-%S"))
}

/// Backup file name for a dump taken now, in local time.
#[must_use]
pub fn backup_filename_now(prefix: &str) -> String {
    backup_filename(prefix, Local::now().naive_local())
}
