// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::path::Path;

use memoria_core::MemoriaError;
use tokio::io::AsyncReadExt;

/// Read a whole file, or stdin when `path` is `None` or `-`.
pub async fn read_input(path: Option<&Path>) -> Result<String, MemoriaError> {
    match path.filter(|p| p.as_os_str() != "-") {
        Some(path) => tokio::fs::read_to_string(path).await.map_err(|e| {
            MemoriaError::InvalidInput(format!("failed to read {}: {e}", path.display()))
        }),
        None => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .map_err(|e| MemoriaError::InvalidInput(format!("failed to read stdin: {e}")))?;
            Ok(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.txt");
        std::fs::write(&path, "User: hi\n").unwrap();
        assert_eq!(read_input(Some(&path)).await.unwrap(), "User: hi\n");
    }

    #[tokio::test]
    async fn missing_file_is_invalid_input() {
        let err = read_input(Some(Path::new("/nonexistent/chat.txt")))
            .await
            .unwrap_err();
        assert!(err.is_invalid_input());
        assert!(err.to_string().contains("/nonexistent/chat.txt"));
    }
}
