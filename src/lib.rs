pub mod im;

// 重新导出常用类型和函数，方便外部使用
pub use im::{
    client::{ClientConfig, ImClient},
    config::VolcConfig,
    process,
    types::{ApiError, ImResponse},
};
