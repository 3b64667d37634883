use crate::error::ConfigError;
use crate::models::input::Question;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tokio::fs;

/// 问题文件格式
#[derive(Debug, Deserialize)]
struct QuestionsFile {
    questions: Vec<String>,
}

/// 从 TOML 文件加载问题列表
pub async fn load_questions_file(path: &Path) -> Result<Vec<Question>, ConfigError> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;

    let file: QuestionsFile =
        toml::from_str(&content).map_err(|source| ConfigError::QuestionsParseFailed {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::info!(
        "从 {} 加载了 {} 个问题",
        path.display(),
        file.questions.len()
    );

    validate_questions(file.questions.into_iter().map(Question::from).collect())
}

/// 确定本次运行的问题：优先使用问题文件，否则使用配置中的列表
pub async fn load_questions(
    questions_file: Option<&Path>,
    fallback: &[String],
) -> Result<Vec<Question>, ConfigError> {
    match questions_file {
        Some(path) => load_questions_file(path).await,
        None => validate_questions(fallback.iter().map(|q| Question::new(q.as_str())).collect()),
    }
}

/// 问题不能为空，也不能重复
fn validate_questions(questions: Vec<Question>) -> Result<Vec<Question>, ConfigError> {
    if questions.is_empty() {
        return Err(ConfigError::NoQuestions);
    }

    let mut seen = HashSet::new();
    for question in &questions {
        if !seen.insert(question.text()) {
            return Err(ConfigError::DuplicateQuestion {
                question: question.text().to_string(),
            });
        }
    }

    Ok(questions)
}
