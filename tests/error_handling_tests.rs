use havoc_cli::cli::output::OutputError;
use havoc_cli::{HavocError, HavocResult};
use std::error::Error;

/// Error handling tests
#[cfg(test)]
mod error_handling_tests {
    use super::*;

    #[test]
    fn test_error_types() {
        let errors = vec![
            HavocError::Config { message: "Config error".to_string() },
            HavocError::Remote { message: "Remote error".to_string() },
            HavocError::UnknownCommand("frobnicate".to_string()),
            HavocError::LocalFile { path: "/tmp/x".to_string(), message: "denied".to_string() },
            HavocError::Output("Output error".to_string()),
            HavocError::Terminal("not a tty".to_string()),
        ];

        for error in errors {
            let display = error.to_string();
            assert!(!display.is_empty(), "Error display should not be empty");
        }

        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HavocError>();
    }

    #[test]
    fn test_remote_message_is_verbatim() {
        let error = HavocError::Remote {
            message: "403 Forbidden: invalid signature".to_string(),
        };
        assert_eq!(error.to_string(), "403 Forbidden: invalid signature");
    }

    #[test]
    fn test_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let havoc_error: HavocError = io_error.into();
        assert!(matches!(havoc_error, HavocError::Io(_)));
        assert!(havoc_error.source().is_some());

        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let havoc_error: HavocError = json_error.into();
        assert!(matches!(havoc_error, HavocError::Json(_)));

        let output_error = OutputError::IoError(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe"));
        let havoc_error: HavocError = output_error.into();
        assert!(matches!(havoc_error, HavocError::Output(ref message) if message.contains("pipe")));
    }

    #[test]
    fn test_result_type() {
        fn success_function() -> HavocResult<String> {
            Ok("success".to_string())
        }

        fn error_function() -> HavocResult<String> {
            Err(HavocError::Config {
                message: "Test error".to_string(),
            })
        }

        assert_eq!(success_function().unwrap(), "success");
        let err = error_function().unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: Test error");
    }

    #[test]
    fn test_error_propagation() {
        fn inner() -> HavocResult<()> {
            std::fs::read_to_string("/definitely/not/a/havoc/config")?;
            Ok(())
        }

        fn outer() -> HavocResult<()> {
            inner()?;
            Ok(())
        }

        assert!(matches!(outer(), Err(HavocError::Io(_))));
    }
}
