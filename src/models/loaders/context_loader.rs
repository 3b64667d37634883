use crate::error::ConfigError;
use crate::models::input::SharedContext;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;

/// 读取共享上下文文件
///
/// 文件必须存在且为合法 UTF-8，否则视为配置错误
pub async fn load_shared_context(path: &Path) -> Result<SharedContext, ConfigError> {
    let bytes = fs::read(path).await.map_err(|source| match source.kind() {
        ErrorKind::NotFound => ConfigError::ContextNotFound {
            path: path.to_path_buf(),
        },
        _ => ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let text = String::from_utf8(bytes).map_err(|_| ConfigError::InvalidEncoding {
        path: path.to_path_buf(),
    })?;

    let context = SharedContext::new(text);
    tracing::info!(
        "已加载上下文 {} ({} 字节, 摘要 {})",
        path.display(),
        context.text().len(),
        context.digest()
    );

    Ok(context)
}
