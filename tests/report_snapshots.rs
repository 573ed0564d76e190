use cpu_process_profiler::check::{CheckReport, render_failure};
use cpu_process_profiler::error::{AcquisitionError, CheckError, ConfigError};
use cpu_process_profiler::status::Status;
use cpu_process_profiler::system::cpu::CpuUtilization;
use cpu_process_profiler::system::process::{ProcessSample, rank_top};
use insta::assert_snapshot;

fn busy_host() -> CpuUtilization {
    CpuUtilization {
        user: 61.25,
        system: 14.5,
        idle: 19.75,
        nice: 0.5,
        iowait: 3.0,
        irq: 0.25,
        softirq: 0.75,
        steal: 0.0,
        guest: 0.0,
        guest_nice: 0.0,
        used: 80.25,
    }
}

fn mock_processes() -> Vec<ProcessSample> {
    vec![
        ProcessSample::new(412, 3.5, "sshd"),
        ProcessSample::new(2231, 92.0, "postgres"),
        ProcessSample::new(1, 0.1, "systemd"),
        ProcessSample::new(
            5120,
            41.75,
            "java-with-an-unreasonably-long-main-class-name-for-a-display",
        ),
        ProcessSample::new(77, 3.5, "node"),
    ]
}

#[test]
fn warning_report() {
    let report = CheckReport {
        status: Status::Warning,
        utilization: busy_host(),
        processes: rank_top(mock_processes(), 10),
    };
    assert_snapshot!("warning_report", report.to_string());
}

#[test]
fn report_without_processes() {
    let report = CheckReport {
        status: Status::Ok,
        utilization: CpuUtilization {
            idle: 100.0,
            ..CpuUtilization::default()
        },
        processes: rank_top(Vec::new(), 10),
    };
    assert_snapshot!("report_without_processes", report.to_string());
}

#[test]
fn failure_lines() {
    let unsupported = CheckError::from(AcquisitionError::UnsupportedPlatform("plan9"));
    let inverted = CheckError::from(ConfigError::WarningAboveCritical {
        warning: 85.0,
        critical: 80.0,
    });
    let lines = format!(
        "{}\n{}",
        render_failure(&unsupported),
        render_failure(&inverted)
    );
    assert_snapshot!("failure_lines", lines);
}
