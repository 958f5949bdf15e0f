// Failure taxonomy shared by the catalog, the action dispatcher and the UI loop.

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to connect to the service manager")]
    Connect(#[source] zbus::Error),

    #[error("Unit listing unavailable")]
    SourceUnavailable(#[source] zbus::Error),

    #[error("Job for {unit} finished with result '{result}'")]
    JobFailed { unit: String, result: String },

    #[error("Service manager rejected request for {unit}")]
    JobRejected {
        unit: String,
        #[source]
        source: zbus::Error,
    },

    #[error("Manager configuration reload failed")]
    ConfigReloadFailed(#[source] zbus::Error),

    #[error("Terminal I/O failed")]
    Terminal(#[from] std::io::Error),
}
