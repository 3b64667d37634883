//! 内容摘要
//!
//! 相同文本得到相同摘要，用于构造可重复的请求标识。不处理碰撞。

use md5::{Digest, Md5};

/// 摘要长度（十六进制字符数）
pub const DIGEST_LEN: usize = 32;

/// 计算文本 UTF-8 字节的 MD5，返回小写十六进制
pub fn content_digest(text: &str) -> String {
    hex::encode(Md5::digest(text.as_bytes()))
}
