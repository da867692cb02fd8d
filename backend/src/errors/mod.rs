use anyhow::anyhow;

/// Describe a failing adapter call, e.g. `[ppa] fetch results`
pub fn source_context(source: &str, operation: &str) -> String {
    format!("[{}] {}", source, operation)
}

/// Collapse an error chain into a single error naming the source and operation
pub fn with_source_context<T>(
    result: anyhow::Result<T>,
    source: &str,
    operation: &str,
) -> anyhow::Result<T> {
    result.map_err(|e| anyhow!("{}: {:#}", source_context(source, operation), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_source_context_prefixes_message() {
        let failed: anyhow::Result<()> = Err(anyhow!("HTTP 503")).context("GET /tournaments");
        let err = with_source_context(failed, "apt", "fetch tournaments").unwrap_err();
        assert_eq!(err.to_string(), "[apt] fetch tournaments: GET /tournaments: HTTP 503");
    }

    #[test]
    fn test_success_passes_through() {
        let ok = with_source_context(Ok(3), "ppa", "fetch results").unwrap();
        assert_eq!(ok, 3);
    }
}
