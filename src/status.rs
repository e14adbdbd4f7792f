pub mod status {
    use std::os::raw::c_int;
    use thiserror::Error;

    // C 接口状态码定义
    /// 操作成功
    pub const CLIST_SUCCESS: c_int = 0;
    /// 参数无效：空指针、零长度数据，或接收者不是本引擎的实例
    pub const CLIST_ERROR_INVALID_PARAMETER: c_int = -1;
    /// 内存不足：复制数据缓冲区失败
    pub const CLIST_ERROR_NOT_ENOUGH_MEMORY: c_int = -2;
    /// 一般性失败
    pub const CLIST_ERROR_UNSUCCESSFUL: c_int = -3;

    // 错误定义
    #[derive(Debug, Error, Clone, PartialEq, Eq)]
    pub enum ListError {
        #[error("参数无效: 空位置或零长度数据")]
        InvalidParameter,
        #[error("内存不足: 无法复制 {size} 字节数据")]
        NotEnoughMemory { size: usize },
        #[error("操作失败")]
        Unsuccessful,
    }

    impl ListError {
        /// 将错误映射为 C 接口状态码
        ///
        /// # 返回值
        /// 对应的 `CLIST_ERROR_*` 常量，成功一侧由 `CLIST_SUCCESS` 表示，
        /// 不经过本枚举。
        pub fn to_c_status(&self) -> c_int {
            match self {
                ListError::InvalidParameter => CLIST_ERROR_INVALID_PARAMETER,
                ListError::NotEnoughMemory { .. } => CLIST_ERROR_NOT_ENOUGH_MEMORY,
                ListError::Unsuccessful => CLIST_ERROR_UNSUCCESSFUL,
            }
        }
    }

}
