/// Exit code for I/O and usage errors.
pub const EXIT_IO: u8 = 2;
/// Exit code when the requested data has nothing usable in it.
pub const EXIT_NO_DATA: u8 = 3;
/// Exit code for internal and numerical failures.
pub const EXIT_INTERNAL: u8 = 4;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// Shorthand for an I/O failure on `path`.
    pub fn io(action: &str, path: &std::path::Path, err: std::io::Error) -> Self {
        Self::new(EXIT_IO, format!("Failed to {action} '{}': {err}", path.display()))
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn io_error_carries_path_and_exit_code() {
        let err = AppError::io(
            "open scan file",
            Path::new("results/clean/u.txt"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.exit_code(), EXIT_IO);
        assert_eq!(err.to_string(), "Failed to open scan file 'results/clean/u.txt': gone");
    }
}
