// tests/logging_filter.rs
use jobexec::cli::LogLevel;
use jobexec::logging::{filter_directives, JOB_LOG_TARGET};

#[test]
fn defaults_to_info() {
    assert_eq!(filter_directives(None, None), vec!["info"]);
    assert_eq!(filter_directives(None, Some("")), vec!["info"]);
}

#[test]
fn env_level_replaces_the_default() {
    assert_eq!(filter_directives(None, Some("DEBUG")), vec!["debug"]);
}

#[test]
fn cli_level_wins_over_env_level() {
    assert_eq!(
        filter_directives(Some(LogLevel::Warn), Some("trace")),
        vec!["warn"]
    );
}

#[test]
fn job_output_can_be_filtered_separately() {
    let directives = filter_directives(Some(LogLevel::Error), Some("debug, job_log=info"));
    assert_eq!(directives, vec!["error", "job_log=info"]);
    assert!(directives[1].starts_with(JOB_LOG_TARGET));
}

#[test]
fn unparseable_entries_are_skipped() {
    assert_eq!(
        filter_directives(None, Some("job_log=loud,jobexec=debug")),
        vec!["info", "jobexec=debug"]
    );
}
