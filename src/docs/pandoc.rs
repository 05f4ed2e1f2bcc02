use crate::error::{LandscapeError, LandscapeResult};
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Convert a Markdown file to `.docx` with the external converter.
pub fn convert(pandoc: &str, input: &Path, output: &Path) -> LandscapeResult<()> {
    debug!("{} {} -o {}", pandoc, input.display(), output.display());

    let result = Command::new(pandoc)
        .arg(input)
        .arg("-o")
        .arg(output)
        .args(["--from", "markdown", "--to", "docx"])
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LandscapeError::Conversion(format!(
                    "'{}' not found; install pandoc or set PANDOC_PATH",
                    pandoc
                ))
            } else {
                LandscapeError::Conversion(format!("failed to run '{}': {}", pandoc, e))
            }
        })?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        return Err(LandscapeError::Conversion(format!(
            "'{}' exited with {}: {}",
            pandoc,
            result.status,
            stderr.trim()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_converter() {
        let dir = TempDir::new().unwrap();
        let err = convert(
            "/nonexistent/pandoc",
            &dir.path().join("a.md"),
            &dir.path().join("a.docx"),
        )
        .unwrap_err();
        assert!(matches!(err, LandscapeError::Conversion(_)));
        assert!(err.to_string().contains("PANDOC_PATH"));
    }

    #[cfg(unix)]
    #[test]
    fn test_converter_exit_status() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("a.md");
        let output = dir.path().join("a.docx");

        assert!(convert("true", &input, &output).is_ok());
        assert!(matches!(
            convert("false", &input, &output),
            Err(LandscapeError::Conversion(_))
        ));
    }
}
