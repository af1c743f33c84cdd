use model::report::summary::RunReport;

/// Process exit codes for `redshift-migrate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    TablesFailed = 1,
    ListingFailed = 2,
    ConfigError = 3,
    GeneralError = 4,
}

impl ExitCode {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// `TablesFailed` as soon as one table did not reach `Done`.
    pub fn for_report(report: &RunReport) -> Self {
        if report.is_success() {
            ExitCode::Success
        } else {
            ExitCode::TablesFailed
        }
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code.as_u8())
    }
}
