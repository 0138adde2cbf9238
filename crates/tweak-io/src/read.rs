use super::*;
// Read-path helpers and char-indexed line slicing.

pub(crate) async fn read_file_to_string_abs(path: &Path) -> Result<String, RewriteError> {
    if !path.is_absolute() {
        return Err(RewriteError::FileRead {
            path: path.to_path_buf(),
            reason: "path must be absolute".to_string(),
        });
    }

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| RewriteError::FileRead {
            path: path.to_path_buf(),
            reason: format!("{e} (kind: {:?})", e.kind()),
        })?;

    String::from_utf8(bytes).map_err(|e| RewriteError::FileRead {
        path: path.to_path_buf(),
        reason: format!("invalid UTF-8: {e}"),
    })
}

/// Byte offset of the `char_idx`-th character, allowing one-past-the-end.
fn byte_offset(line: &str, char_idx: usize) -> Option<usize> {
    line.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(line.len()))
        .nth(char_idx)
}

/// `len` characters starting at character `start`, clipped to the line.
pub(crate) fn char_window(line: &str, start: usize, len: usize) -> &str {
    let Some(from) = byte_offset(line, start) else {
        return "";
    };
    let tail = &line[from..];
    let to = byte_offset(tail, len).unwrap_or(tail.len());
    &tail[..to]
}

/// Replace `old_len` characters at character `start` with `replacement`.
pub(crate) fn splice_chars(line: &str, start: usize, old_len: usize, replacement: &str) -> String {
    let window = char_window(line, start, old_len);
    let from = byte_offset(line, start).unwrap_or(line.len());
    let to = from + window.len();
    let mut out = String::with_capacity(line.len() + replacement.len());
    out.push_str(&line[..from]);
    out.push_str(replacement);
    out.push_str(&line[to..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn char_window_counts_chars_not_bytes() {
        let line = "é = 12°;";
        assert_eq!(char_window(line, 4, 3), "12°");
        assert_eq!(char_window(line, 6, 10), "°;");
        assert_eq!(char_window(line, 42, 2), "");
    }

    #[test]
    fn splice_replaces_only_the_window() {
        assert_eq!(splice_chars("width: 10;", 7, 2, "999"), "width: 999;");
        assert_eq!(splice_chars("ü 1.5s", 2, 4, ".25s"), "ü .25s");
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let dir = tempdir().unwrap();
        let err = read_file_to_string_abs(&dir.path().join("nope.css"))
            .await
            .unwrap_err();
        assert!(matches!(err, RewriteError::FileRead { .. }));
    }

    #[tokio::test]
    async fn invalid_utf8_is_a_read_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        std::fs::write(&path, b"x = \xc3(1)").unwrap();
        let err = read_file_to_string_abs(&path).await.unwrap_err();
        assert!(matches!(err, RewriteError::FileRead { reason, .. } if reason.contains("UTF-8")));
    }

    #[tokio::test]
    async fn relative_path_is_rejected() {
        let err = read_file_to_string_abs(Path::new("relative.css"))
            .await
            .unwrap_err();
        assert!(matches!(err, RewriteError::FileRead { .. }));
    }
}
