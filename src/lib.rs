//! Test-only root package; the workspace-level integration tests live in `tests/`
