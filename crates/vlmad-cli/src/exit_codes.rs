//! Process exit codes. Part of the CLI contract.

pub const SUCCESS: i32 = 0;
pub const CONFIG_ERROR: i32 = 2; // Unreadable/malformed input or invalid options
pub const OUTPUT_ERROR: i32 = 3; // Output file could not be written

/// Exit code for a fatal error returned by a command.
pub fn for_error(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<vlmad_core::PipelineError>()
        .map(vlmad_core::PipelineError::exit_code)
        .unwrap_or(CONFIG_ERROR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vlmad_core::PipelineError;

    #[test]
    fn pipeline_errors_keep_their_code() {
        let err = anyhow::Error::new(PipelineError::OutputWrite {
            path: "out.json".into(),
            message: "disk full".into(),
        });
        assert_eq!(for_error(&err), OUTPUT_ERROR);

        let err = anyhow::Error::new(PipelineError::config("bad")).context("while starting");
        assert_eq!(for_error(&err), CONFIG_ERROR);
    }

    #[test]
    fn other_errors_are_config_errors() {
        assert_eq!(for_error(&anyhow::anyhow!("unknown provider")), CONFIG_ERROR);
    }
}
