//! `PATH=VALUE` assignments, as taken on the command line.

use crate::error::AppError;
use yangcond_traits::InMemoryStore;
use yangcond_types::DataNode;

/// Splits `PATH=VALUE` at the first `=`. The path must be absolute.
pub fn parse_assignment(text: &str) -> Result<(&str, &str), AppError> {
    match text.split_once('=') {
        Some((path, value)) if path.starts_with('/') && path.len() > 1 => Ok((path, value)),
        _ => Err(AppError::InvalidAssignment(text.to_string())),
    }
}

/// Builds a data tree rooted at `/` from assignments.
pub fn build_tree<S: AsRef<str>>(assignments: &[S]) -> Result<DataNode, AppError> {
    let mut root = DataNode::new("/");
    for assignment in assignments {
        let (path, value) = parse_assignment(assignment.as_ref())?;
        if !root.insert(path, value) {
            return Err(AppError::InvalidAssignment(assignment.as_ref().to_string()));
        }
    }
    Ok(root)
}

/// Fills a store from assignments.
pub fn build_store<S: AsRef<str>>(assignments: &[S]) -> Result<InMemoryStore, AppError> {
    let store = InMemoryStore::new();
    for assignment in assignments {
        let (path, value) = parse_assignment(assignment.as_ref())?;
        store
            .set(path, value)
            .map_err(|_| AppError::InvalidAssignment(assignment.as_ref().to_string()))?;
    }
    Ok(store)
}
