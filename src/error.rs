use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// 批处理过程中可能出现的错误，任何一种都会终止整个流程
#[derive(Error, Debug)]
pub enum Error {
    /// 图片无法解码
    #[error("无法解码图片 {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// 图片无法编码为目标格式
    #[error("无法保存图片 {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// 文件或目录读写失败
    #[error("无法访问 {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 模型、预测结果或标签文件中存在格式错误的行
    #[error("{}:{line}: {reason}", .path.display())]
    Parse { path: PathBuf, line: usize, reason: String },

    /// 模型中没有任何记录
    #[error("模型为空，无法进行搜索")]
    EmptyModel,

    /// 训练目录中没有找到任何图片
    #[error("没有找到可用于训练的图片: {}", .0.display())]
    EmptyDataset(PathBuf),

    /// 工作线程在返回结果之前退出
    #[error("工作线程意外退出")]
    WorkerLost,
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub fn parse(path: impl Into<PathBuf>, line: usize, reason: impl Into<String>) -> Self {
        Self::Parse { path: path.into(), line, reason: reason.into() }
    }
}
