//! 产物写出
//!
//! 先把全部产物写到同目录下的临时文件，都成功后再逐个改名。
//! 已存在的同名文件在改名前移到备份位置；任何一步失败都会清理临时文件，
//! 并把本次已替换的文件恢复成原来的内容，不留下新旧混杂的输出。

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::emit::Artifacts;
use crate::error::{Error, Result};

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> Error + '_ {
    move |source| Error::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// 把产物写到 `out_dir`，返回写出的文件路径（类型在前，模块在后）
pub fn write_artifacts(out_dir: &Path, artifacts: &Artifacts) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir).map_err(io_error(out_dir))?;

    let mut staged: Vec<(PathBuf, PathBuf)> = Vec::new();
    for artifact in artifacts.iter() {
        let target = out_dir.join(&artifact.file_name);
        let tmp = out_dir.join(format!(".{}.tmp", artifact.file_name));
        if let Err(e) = fs::write(&tmp, &artifact.contents) {
            let _ = fs::remove_file(&tmp);
            discard(&staged);
            return Err(io_error(&tmp)(e));
        }
        debug!("staged {}", tmp.display());
        staged.push((tmp, target));
    }

    let mut placed: Vec<(PathBuf, Option<PathBuf>)> = Vec::with_capacity(staged.len());
    for (i, (tmp, target)) in staged.iter().enumerate() {
        match place(tmp, target) {
            Ok(backup) => {
                info!("wrote {}", target.display());
                placed.push((target.clone(), backup));
            }
            Err(e) => {
                discard(&staged[i..]);
                restore(&placed);
                return Err(io_error(target)(e));
            }
        }
    }

    for (_, backup) in &placed {
        if let Some(backup) = backup {
            let _ = fs::remove_file(backup);
        }
    }
    Ok(placed.into_iter().map(|(target, _)| target).collect())
}

/// 把临时文件改名到目标位置，返回原文件的备份路径（如有）
fn place(tmp: &Path, target: &Path) -> std::io::Result<Option<PathBuf>> {
    let backup = if target.is_file() {
        let name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let backup = target.with_file_name(format!(".{}.bak", name));
        fs::rename(target, &backup)?;
        debug!("backed up {} to {}", target.display(), backup.display());
        Some(backup)
    } else {
        None
    };

    if let Err(e) = fs::rename(tmp, target) {
        if let Some(backup) = &backup {
            let _ = fs::rename(backup, target);
        }
        return Err(e);
    }
    Ok(backup)
}

/// 撤销已完成的替换：有备份的恢复原文件，没有的直接删除
fn restore(placed: &[(PathBuf, Option<PathBuf>)]) {
    for (target, backup) in placed.iter().rev() {
        match backup {
            Some(backup) => {
                let _ = fs::rename(backup, target);
            }
            None => {
                let _ = fs::remove_file(target);
            }
        }
    }
}

fn discard(staged: &[(PathBuf, PathBuf)]) {
    for (tmp, _) in staged {
        let _ = fs::remove_file(tmp);
    }
}
