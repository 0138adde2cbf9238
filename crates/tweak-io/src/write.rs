/*!
Atomic whole-file write

The target is replaced via temp file in the same directory + write + fsync +
rename, followed by a best-effort fsync of the parent directory. A crash at any
point leaves either the old or the new content on disk, never a mix. The temp
file inherits the target's permissions before the rename.
*/

use super::*;
use tokio::io::AsyncWriteExt;

pub(crate) async fn write_file_atomic(
    target_path: &Path,
    content: &str,
    sync_parent_dir: bool,
) -> Result<(), RewriteError> {
    let parent = target_path.parent().ok_or_else(|| {
        RewriteError::write(
            "write",
            target_path,
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "file has no parent directory",
            ),
        )
    })?;
    let file_name = target_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp_path = parent.join(format!(".{file_name}.tweak-{}.tmp", uuid::Uuid::new_v4()));

    let written = write_temp(&tmp_path, target_path, content).await;
    let renamed = match written {
        Ok(()) => tokio::fs::rename(&tmp_path, target_path)
            .await
            .map_err(|e| RewriteError::write("rename", target_path, e)),
        Err(e) => Err(e),
    };
    if let Err(e) = renamed {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(e);
    }

    if sync_parent_dir {
        let parent = parent.to_path_buf();
        let _ = tokio::task::spawn_blocking(move || {
            if let Ok(dir) = std::fs::File::open(&parent) {
                let _ = dir.sync_all();
            }
        })
        .await;
    }
    Ok(())
}

async fn write_temp(tmp_path: &Path, target_path: &Path, content: &str) -> Result<(), RewriteError> {
    let mut f = tokio::fs::File::create(tmp_path)
        .await
        .map_err(|e| RewriteError::write("create", tmp_path, e))?;
    f.write_all(content.as_bytes())
        .await
        .map_err(|e| RewriteError::write("write", tmp_path, e))?;
    f.sync_all()
        .await
        .map_err(|e| RewriteError::write("sync", tmp_path, e))?;

    if let Ok(meta) = tokio::fs::metadata(target_path).await {
        tokio::fs::set_permissions(tmp_path, meta.permissions())
            .await
            .map_err(|e| RewriteError::write("set_permissions", tmp_path, e))?;
    }
    Ok(())
}
