pub mod capi {
    use std::mem::ManuallyDrop;
    use std::os::raw::{c_int, c_void};
    use std::ptr;
    use std::slice;

    use crate::other_list::{ErasedList, ListProtocol, Node, alloc_buffer, free_buffer};
    use crate::other_status::{
        CLIST_ERROR_INVALID_PARAMETER, CLIST_SUCCESS,
    };

    /// 链表实例的结构标识
    ///
    /// 每个由 [crate::other_capi::clist_new] 创建的实例都以这 8 个字节开头。
    /// 公开入口在触碰任何引擎状态之前先核对这个标识，持有兼容布局的
    /// 无关指针会在这一步被拒绝。
    pub const CLIST_STRUCT_ID: u64 = u64::from_le_bytes(*b"CLIST...");

    /// 不透明链表句柄，对 C 完全隐藏实现细节
    ///
    /// `struct_id` 必须是结构的第一个字段：C 端只持有指向本结构的指针，
    /// 校验动作就是读取开头 8 个字节与 [CLIST_STRUCT_ID] 比较。
    #[repr(C)]
    pub struct CErasedList {
        struct_id: u64,
        inner: ErasedList,
    }

    /// 由裸句柄恢复出链表实例
    ///
    /// 空指针或结构标识不匹配都视为"不是我的实例"，返回 `None`；
    /// 两种情况对调用方不作区分。
    fn get_this<'a>(list: *mut CErasedList) -> Option<&'a mut CErasedList> {
        if list.is_null() {
            return None;
        }
        unsafe {
            if (*list).struct_id != CLIST_STRUCT_ID {
                return None;
            }
            Some(&mut *list)
        }
    }

    /// 创建一个空链表实例
    ///
    /// 返回值:
    /// - 指向新实例的不透明句柄，结构标识已写入。
    ///   创建失败时（理论上只有分配失败）返回空指针。
    #[unsafe(no_mangle)]
    pub extern "C" fn clist_new() -> *mut CErasedList {
        Box::into_raw(Box::new(CErasedList {
            struct_id: CLIST_STRUCT_ID,
            inner: ErasedList::new(),
        }))
    }

    /// 释放由 [clist_new] 创建的链表实例及其全部节点
    ///
    /// 注意:
    /// - 空指针或未通过标识校验的句柄不执行任何操作；
    /// - 释放前会清零结构标识，已失效的旧句柄之后无法再通过校验。
    #[unsafe(no_mangle)]
    pub extern "C" fn clist_free(list: *mut CErasedList) {
        if get_this(list).is_none() {
            return;
        }
        unsafe {
            (*list).struct_id = 0;
            let _ = Box::from_raw(list);
        }
    }

    /// 在链表头部插入一份 `data` 的副本
    ///
    /// 参数:
    /// - `list`: 链表句柄。
    /// - `data`: 指向任意负载的指针，内容被逐字节复制。
    /// - `data_size`: 负载长度，必须大于 0。
    ///
    /// 返回值:
    /// - `CLIST_SUCCESS` 插入成功；
    /// - `CLIST_ERROR_INVALID_PARAMETER` 句柄无效、`data` 为空或长度为 0；
    /// - `CLIST_ERROR_NOT_ENOUGH_MEMORY` 复制缓冲区失败，链表保持原状。
    #[unsafe(no_mangle)]
    pub extern "C" fn clist_push_front(
        list: *mut CErasedList,
        data: *const c_void,
        data_size: usize,
    ) -> c_int {
        let this = match get_this(list) {
            Some(this) => this,
            None => return CLIST_ERROR_INVALID_PARAMETER,
        };
        if data.is_null() || data_size == 0 {
            return CLIST_ERROR_INVALID_PARAMETER;
        }

        let payload = unsafe { slice::from_raw_parts(data as *const u8, data_size) };
        match this.inner.push_front(payload) {
            Ok(()) => CLIST_SUCCESS,
            Err(e) => e.to_c_status(),
        }
    }

    /// 在链表尾部插入一份 `data` 的副本
    ///
    /// 参数和状态码同 [clist_push_front]。
    #[unsafe(no_mangle)]
    pub extern "C" fn clist_push_back(
        list: *mut CErasedList,
        data: *const c_void,
        data_size: usize,
    ) -> c_int {
        let this = match get_this(list) {
            Some(this) => this,
            None => return CLIST_ERROR_INVALID_PARAMETER,
        };
        if data.is_null() || data_size == 0 {
            return CLIST_ERROR_INVALID_PARAMETER;
        }

        let payload = unsafe { slice::from_raw_parts(data as *const u8, data_size) };
        match this.inner.push_back(payload) {
            Ok(()) => CLIST_SUCCESS,
            Err(e) => e.to_c_status(),
        }
    }

    /// 在 `position` 节点之前插入一份 `data` 的副本
    ///
    /// `position` 为头节点时新节点成为新的头。
    ///
    /// 注意:
    /// - `position` 必须是本链表中仍存活的节点，传入其他链表的节点
    ///   或已弹出的节点属于未定义行为，引擎不做防护。
    #[unsafe(no_mangle)]
    pub extern "C" fn clist_insert_before(
        list: *mut CErasedList,
        position: *mut Node,
        data: *const c_void,
        data_size: usize,
    ) -> c_int {
        let this = match get_this(list) {
            Some(this) => this,
            None => return CLIST_ERROR_INVALID_PARAMETER,
        };
        if position.is_null() || data.is_null() || data_size == 0 {
            return CLIST_ERROR_INVALID_PARAMETER;
        }

        unsafe {
            let payload = slice::from_raw_parts(data as *const u8, data_size);
            match this.inner.insert_before(position, payload) {
                Ok(()) => CLIST_SUCCESS,
                Err(e) => e.to_c_status(),
            }
        }
    }

    /// 在 `position` 节点之后插入一份 `data` 的副本
    ///
    /// `position` 为尾节点时新节点成为新的尾。约束同 [clist_insert_before]。
    #[unsafe(no_mangle)]
    pub extern "C" fn clist_insert_after(
        list: *mut CErasedList,
        position: *mut Node,
        data: *const c_void,
        data_size: usize,
    ) -> c_int {
        let this = match get_this(list) {
            Some(this) => this,
            None => return CLIST_ERROR_INVALID_PARAMETER,
        };
        if position.is_null() || data.is_null() || data_size == 0 {
            return CLIST_ERROR_INVALID_PARAMETER;
        }

        unsafe {
            let payload = slice::from_raw_parts(data as *const u8, data_size);
            match this.inner.insert_after(position, payload) {
                Ok(()) => CLIST_SUCCESS,
                Err(e) => e.to_c_status(),
            }
        }
    }

    /// 返回头节点
    ///
    /// 返回值:
    /// - 头节点句柄；链表为空或句柄无效时一律返回空指针，
    ///   这一结果类型没有状态通道，两种情况对调用方不可区分。
    #[unsafe(no_mangle)]
    pub extern "C" fn clist_front(list: *mut CErasedList) -> *mut Node {
        match get_this(list) {
            Some(this) => this.inner.front(),
            None => ptr::null_mut(),
        }
    }

    /// 返回尾节点，约定同 [clist_front]
    #[unsafe(no_mangle)]
    pub extern "C" fn clist_back(list: *mut CErasedList) -> *mut Node {
        match get_this(list) {
            Some(this) => this.inner.back(),
            None => ptr::null_mut(),
        }
    }

    /// 返回 `position` 的后继节点
    ///
    /// 返回值:
    /// - 后继节点句柄；`position` 为空、没有后继或句柄无效时
    ///   一律返回空指针。
    #[unsafe(no_mangle)]
    pub extern "C" fn clist_next(list: *mut CErasedList, position: *mut Node) -> *mut Node {
        match get_this(list) {
            Some(this) => unsafe { this.inner.next(position) },
            None => ptr::null_mut(),
        }
    }

    /// 返回 `position` 的前驱节点，约定同 [clist_next]
    #[unsafe(no_mangle)]
    pub extern "C" fn clist_prev(list: *mut CErasedList, position: *mut Node) -> *mut Node {
        match get_this(list) {
            Some(this) => unsafe { this.inner.prev(position) },
            None => ptr::null_mut(),
        }
    }

    /// 获取 `position` 节点内部缓冲区指针和长度字段的地址
    ///
    /// 参数:
    /// - `data`: 输出，指向节点内部 `data` 字段的地址（三级指针）。
    /// - `data_size`: 输出，指向节点内部 `data_size` 字段的地址。
    ///
    /// 注意:
    /// - 这是刻意保留的低层逃生通道：调用方可以经由返回的地址原地改写、
    ///   重新分配或调整负载；换入新缓冲区前必须先用 [clist_buffer_free]
    ///   释放旧缓冲区，新缓冲区必须来自 [clist_buffer_alloc]，
    ///   并保持两个字段一致；
    /// - 返回的地址在节点被弹出后失效。
    #[unsafe(no_mangle)]
    pub extern "C" fn clist_get_ref_to_data(
        list: *mut CErasedList,
        position: *mut Node,
        data: *mut *mut *mut c_void,
        data_size: *mut *mut usize,
    ) -> c_int {
        let this = match get_this(list) {
            Some(this) => this,
            None => return CLIST_ERROR_INVALID_PARAMETER,
        };
        if position.is_null() || data.is_null() || data_size.is_null() {
            return CLIST_ERROR_INVALID_PARAMETER;
        }

        unsafe {
            match this.inner.get_ref_to_data(position) {
                Ok((buf_field, size_field)) => {
                    *data = buf_field as *mut *mut c_void;
                    *data_size = size_field;
                    CLIST_SUCCESS
                }
                Err(e) => e.to_c_status(),
            }
        }
    }

    /// 获取 `position` 节点数据的一份独立副本
    ///
    /// 参数:
    /// - `data`: 输出，新分配的副本，所有权归调用方，
    ///   用完后必须以 [clist_buffer_free] 释放。
    /// - `data_size`: 输出，副本长度。
    ///
    /// 返回值:
    /// - `CLIST_SUCCESS` / `CLIST_ERROR_INVALID_PARAMETER` /
    ///   `CLIST_ERROR_NOT_ENOUGH_MEMORY`。
    #[unsafe(no_mangle)]
    pub extern "C" fn clist_get_copy_data(
        list: *mut CErasedList,
        position: *mut Node,
        data: *mut *mut c_void,
        data_size: *mut usize,
    ) -> c_int {
        let this = match get_this(list) {
            Some(this) => this,
            None => return CLIST_ERROR_INVALID_PARAMETER,
        };
        if position.is_null() || data.is_null() || data_size.is_null() {
            return CLIST_ERROR_INVALID_PARAMETER;
        }

        unsafe {
            match this.inner.get_copy_data(position) {
                Ok(copy) => {
                    // 所有权移交给 C 端，由 clist_buffer_free 回收
                    let mut copy = ManuallyDrop::new(copy);
                    *data_size = copy.len();
                    *data = copy.as_mut_ptr() as *mut c_void;
                    CLIST_SUCCESS
                }
                Err(e) => e.to_c_status(),
            }
        }
    }

    /// 移除并释放头节点
    ///
    /// 注意:
    /// - 空链表或无效句柄时静默无操作，本操作没有状态通道。
    #[unsafe(no_mangle)]
    pub extern "C" fn clist_pop_front(list: *mut CErasedList) {
        if let Some(this) = get_this(list) {
            let _ = this.inner.pop_front();
        }
    }

    /// 移除并释放尾节点，约定同 [clist_pop_front]
    #[unsafe(no_mangle)]
    pub extern "C" fn clist_pop_back(list: *mut CErasedList) {
        if let Some(this) = get_this(list) {
            let _ = this.inner.pop_back();
        }
    }

    /// 返回当前节点数
    ///
    /// 返回值:
    /// - 节点数；句柄无效时返回 0，与空链表不可区分。
    #[unsafe(no_mangle)]
    pub extern "C" fn clist_size(list: *mut CErasedList) -> usize {
        match get_this(list) {
            Some(this) => this.inner.size(),
            None => 0,
        }
    }

    /// 分配一块 `size` 字节的缓冲区
    ///
    /// 经 [clist_get_ref_to_data] 换入节点的缓冲区必须来自这里，
    /// 这样节点释放时分配布局才能对上。`size` 为 0 或分配失败返回空指针。
    #[unsafe(no_mangle)]
    pub extern "C" fn clist_buffer_alloc(size: usize) -> *mut c_void {
        alloc_buffer(size) as *mut c_void
    }

    /// 释放由 [clist_buffer_alloc] 或 [clist_get_copy_data] 得到的缓冲区
    ///
    /// 注意:
    /// - `size` 必须是分配时的长度；
    /// - 空指针不执行任何操作。
    #[unsafe(no_mangle)]
    pub extern "C" fn clist_buffer_free(buf: *mut c_void, size: usize) {
        unsafe { free_buffer(buf as *mut u8, size) };
    }

}
