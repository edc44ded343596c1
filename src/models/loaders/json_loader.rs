use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::{AppResult, FileError};
use crate::models::question::Question;

/// 从 JSON 文件加载题目列表
pub async fn load_json_to_questions(json_file_path: &Path) -> AppResult<Vec<Question>> {
    let content =
        fs::read_to_string(json_file_path)
            .await
            .map_err(|e| FileError::ReadFailed {
                path: json_file_path.display().to_string(),
                source: e,
            })?;

    let questions: Vec<Question> =
        serde_json::from_str(&content).map_err(|e| FileError::JsonParseFailed {
            path: json_file_path.display().to_string(),
            source: e,
        })?;

    Ok(questions)
}

/// 从文件夹中加载所有 JSON 文件并汇总题目列表
///
/// 单个文件加载失败只记录警告，不影响其他文件
pub async fn load_all_json_files(folder_path: &str) -> AppResult<Vec<Question>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        return Err(FileError::DirectoryNotFound {
            path: folder_path.to_string(),
        }
        .into());
    }

    let mut all_questions = Vec::new();
    let mut entries = fs::read_dir(&folder).await.map_err(|e| FileError::ReadFailed {
        path: folder_path.to_string(),
        source: e,
    })?;

    loop {
        let entry = entries.next_entry().await.map_err(|e| FileError::ReadFailed {
            path: folder_path.to_string(),
            source: e,
        })?;
        let entry = match entry {
            Some(entry) => entry,
            None => break,
        };

        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("json") {
            tracing::info!(
                "正在加载: {}",
                path.file_name().unwrap_or_default().to_string_lossy()
            );

            match load_json_to_questions(&path).await {
                Ok(questions) => {
                    tracing::info!("成功加载 {} 道题目", questions.len());
                    all_questions.extend(questions);
                }
                Err(e) => {
                    tracing::warn!("加载文件失败 {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(all_questions)
}
