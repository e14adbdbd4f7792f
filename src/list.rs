pub mod list {
    use std::alloc::{Layout, alloc, dealloc};
    use std::fmt;
    use std::marker::PhantomData;
    use std::ptr;
    use std::slice;

    use crate::other_status::ListError;

    /// 链表节点
    ///
    /// 每个节点独立拥有一块堆上缓冲区 `data`，内容是插入时调用方缓冲区的
    /// 逐字节复制；`data_size` 恒等于该缓冲区的分配长度。节点存活期间
    /// `data` 不为空。`prev`/`next` 仅用于遍历，不持有所有权。
    /// 字段不对外公开，C 头文件里是一个不透明结构。
    #[repr(C)]
    pub struct Node {
        pub(crate) prev: *mut Node,
        pub(crate) next: *mut Node,
        pub(crate) data: *mut u8,
        pub(crate) data_size: usize,
    }

    /// 分配一块 `size` 字节的未初始化缓冲区
    ///
    /// # 返回值
    /// 成功时返回缓冲区指针；`size` 为 0 或分配失败时返回空指针。
    /// 节点缓冲区、数据副本以及 C 端换入的缓冲区都走这一种分配方式，
    /// 释放时布局才能对得上。
    pub(crate) fn alloc_buffer(size: usize) -> *mut u8 {
        if size == 0 {
            return ptr::null_mut();
        }
        match Layout::array::<u8>(size) {
            Ok(layout) => unsafe { alloc(layout) },
            Err(_) => ptr::null_mut(),
        }
    }

    /// 释放由 [`alloc_buffer`] 分配的缓冲区
    ///
    /// # 安全性
    /// `buf` 必须来自 `alloc_buffer(size)` 且尚未释放；调用后指针失效。
    pub(crate) unsafe fn free_buffer(buf: *mut u8, size: usize) {
        if buf.is_null() || size == 0 {
            return;
        }
        if let Ok(layout) = Layout::array::<u8>(size) {
            unsafe { dealloc(buf, layout) };
        }
    }

    /// 创建一个持有 `data` 副本的节点
    ///
    /// 先分配数据缓冲区再分配节点记录；缓冲区分配失败时直接报
    /// `NotEnoughMemory`，此时链表状态未被触碰。
    fn create_node(data: &[u8], prev: *mut Node, next: *mut Node) -> Result<*mut Node, ListError> {
        let buf = alloc_buffer(data.len());
        if buf.is_null() {
            return Err(ListError::NotEnoughMemory { size: data.len() });
        }

        unsafe { ptr::copy_nonoverlapping(data.as_ptr(), buf, data.len()) };

        Ok(Box::into_raw(Box::new(Node {
            prev,
            next,
            data: buf,
            data_size: data.len(),
        })))
    }

    /// 类型擦除的双向链表
    ///
    /// 存储的负载是运行期可变长度的字节序列，同一条链表里的元素长度
    /// 可以各不相同。内部用裸指针串链，因此类型自动为 `!Send`/`!Sync`，
    /// 与单线程使用模型一致；并发使用需要外部互斥。
    pub struct ErasedList {
        pub(crate) head: *mut Node,
        tail: *mut Node,
        len: usize,
        marker: PhantomData<Box<Node>>,
    }

    /// 链表协议：对外的能力表
    ///
    /// C 端以函数表形式暴露的操作面，这里表达为一个 trait，由
    /// [`ErasedList`] 唯一实现。`Position` 即裸节点指针：它只在所属
    /// 链表内有效，节点被弹出后继续使用属于调用方的契约违约。
    pub trait ListProtocol {
        /// 在链表头部插入一份 `data` 的副本
        ///
        /// # 返回值
        /// - `Err(InvalidParameter)`: `data` 为空
        /// - `Err(NotEnoughMemory)`: 复制缓冲区失败，链表不发生任何变化
        fn push_front(&mut self, data: &[u8]) -> Result<(), ListError>;

        /// 在链表尾部插入一份 `data` 的副本
        fn push_back(&mut self, data: &[u8]) -> Result<(), ListError>;

        /// 在 `position` 之前插入一份 `data` 的副本
        ///
        /// `position` 为头节点时新节点成为新的头。
        ///
        /// # 安全性
        /// `position` 必须是本链表中仍存活的节点。
        unsafe fn insert_before(
            &mut self,
            position: *mut Node,
            data: &[u8],
        ) -> Result<(), ListError>;

        /// 在 `position` 之后插入一份 `data` 的副本
        ///
        /// `position` 为尾节点时新节点成为新的尾。
        ///
        /// # 安全性
        /// `position` 必须是本链表中仍存活的节点。
        unsafe fn insert_after(
            &mut self,
            position: *mut Node,
            data: &[u8],
        ) -> Result<(), ListError>;

        /// 返回头节点，链表为空时返回空指针
        fn front(&self) -> *mut Node;

        /// 返回尾节点，链表为空时返回空指针
        fn back(&self) -> *mut Node;

        /// 返回 `position` 的后继
        ///
        /// `position` 为空或没有后继时返回空指针，两种情况不作区分。
        ///
        /// # 安全性
        /// `position` 非空时必须是本链表中仍存活的节点。
        unsafe fn next(&self, position: *mut Node) -> *mut Node;

        /// 返回 `position` 的前驱
        ///
        /// # 安全性
        /// 同 [`ListProtocol::next`]。
        unsafe fn prev(&self, position: *mut Node) -> *mut Node;

        /// 获取节点内部缓冲区指针和长度字段的裸引用
        ///
        /// 这是类型擦除带来的低层逃生通道：调用方不知道负载的逻辑类型，
        /// 却要能原地替换内容和长度，所以引擎直接交出两个字段的地址。
        ///
        /// # 安全性
        /// - `position` 必须是本链表中仍存活的节点；
        /// - 通过返回指针换入新缓冲区前，调用方必须自行用
        ///   [`free_buffer`]（C 端为 `clist_buffer_free`）释放旧缓冲区，
        ///   新缓冲区必须来自同一分配方式，且两个字段保持一致；
        /// - 返回的指针不得在节点弹出后继续使用。
        unsafe fn get_ref_to_data(
            &mut self,
            position: *mut Node,
        ) -> Result<(*mut *mut u8, *mut usize), ListError>;

        /// 获取节点数据的一份独立副本
        ///
        /// 副本由调用方拥有，之后对副本或节点任意一方的修改互不可见。
        ///
        /// # 安全性
        /// `position` 必须是本链表中仍存活的节点。
        unsafe fn get_copy_data(&self, position: *mut Node) -> Result<Vec<u8>, ListError>;

        /// 移除并返回头节点的数据，空链表时返回 `None` 且不做任何事
        fn pop_front(&mut self) -> Option<Vec<u8>>;

        /// 移除并返回尾节点的数据，空链表时返回 `None` 且不做任何事
        fn pop_back(&mut self) -> Option<Vec<u8>>;

        /// 当前节点数
        fn size(&self) -> usize;
    }

    impl ErasedList {
        /// 构造一个空链表
        pub fn new() -> Self {
            ErasedList {
                head: ptr::null_mut(),
                tail: ptr::null_mut(),
                len: 0,
                marker: PhantomData,
            }
        }

        /// 当前节点数
        pub fn len(&self) -> usize {
            self.len
        }

        /// 链表是否为空
        pub fn is_empty(&self) -> bool {
            self.len == 0
        }

        /// 从头到尾遍历各节点负载的只读迭代器
        pub fn iter(&self) -> Iter<'_> {
            Iter {
                current: self.head,
                marker: PhantomData,
            }
        }

        /// 深拷贝整条链表
        ///
        /// 每个负载都重新分配复制，所以可能失败；失败时已复制的部分
        /// 随返回值一起释放。
        pub fn try_clone(&self) -> Result<Self, ListError> {
            let mut list = ErasedList::new();
            for payload in self.iter() {
                list.push_back(payload)?;
            }
            Ok(list)
        }
    }

    impl ListProtocol for ErasedList {
        fn push_front(&mut self, data: &[u8]) -> Result<(), ListError> {
            if data.is_empty() {
                return Err(ListError::InvalidParameter);
            }

            let node = create_node(data, ptr::null_mut(), self.head)?;

            if !self.head.is_null() {
                unsafe { (*self.head).prev = node };
            } else {
                self.tail = node;
            }

            self.head = node;
            self.len += 1;
            Ok(())
        }

        fn push_back(&mut self, data: &[u8]) -> Result<(), ListError> {
            if data.is_empty() {
                return Err(ListError::InvalidParameter);
            }

            let node = create_node(data, self.tail, ptr::null_mut())?;

            if !self.tail.is_null() {
                unsafe { (*self.tail).next = node };
            } else {
                self.head = node;
            }

            self.tail = node;
            self.len += 1;
            Ok(())
        }

        unsafe fn insert_before(
            &mut self,
            position: *mut Node,
            data: &[u8],
        ) -> Result<(), ListError> {
            if position.is_null() || data.is_empty() {
                return Err(ListError::InvalidParameter);
            }

            unsafe {
                let node = create_node(data, (*position).prev, position)?;

                if !(*position).prev.is_null() {
                    (*(*position).prev).next = node;
                } else {
                    self.head = node;
                }
                (*position).prev = node;
            }

            self.len += 1;
            Ok(())
        }

        unsafe fn insert_after(
            &mut self,
            position: *mut Node,
            data: &[u8],
        ) -> Result<(), ListError> {
            if position.is_null() || data.is_empty() {
                return Err(ListError::InvalidParameter);
            }

            unsafe {
                let node = create_node(data, position, (*position).next)?;

                if !(*position).next.is_null() {
                    (*(*position).next).prev = node;
                } else {
                    self.tail = node;
                }
                (*position).next = node;
            }

            self.len += 1;
            Ok(())
        }

        fn front(&self) -> *mut Node {
            self.head
        }

        fn back(&self) -> *mut Node {
            self.tail
        }

        unsafe fn next(&self, position: *mut Node) -> *mut Node {
            if position.is_null() {
                return ptr::null_mut();
            }
            unsafe { (*position).next }
        }

        unsafe fn prev(&self, position: *mut Node) -> *mut Node {
            if position.is_null() {
                return ptr::null_mut();
            }
            unsafe { (*position).prev }
        }

        unsafe fn get_ref_to_data(
            &mut self,
            position: *mut Node,
        ) -> Result<(*mut *mut u8, *mut usize), ListError> {
            if position.is_null() {
                return Err(ListError::InvalidParameter);
            }

            unsafe {
                Ok((
                    &mut (*position).data as *mut *mut u8,
                    &mut (*position).data_size as *mut usize,
                ))
            }
        }

        unsafe fn get_copy_data(&self, position: *mut Node) -> Result<Vec<u8>, ListError> {
            if position.is_null() {
                return Err(ListError::InvalidParameter);
            }

            unsafe {
                let size = (*position).data_size;
                let buf = alloc_buffer(size);
                if buf.is_null() {
                    return Err(ListError::NotEnoughMemory { size });
                }
                ptr::copy_nonoverlapping((*position).data, buf, size);
                Ok(Vec::from_raw_parts(buf, size, size))
            }
        }

        fn pop_front(&mut self) -> Option<Vec<u8>> {
            if self.head.is_null() {
                return None;
            }

            unsafe {
                let old_head = Box::from_raw(self.head);
                self.head = old_head.next;

                if !self.head.is_null() {
                    (*self.head).prev = ptr::null_mut();
                } else {
                    self.tail = ptr::null_mut();
                }

                self.len -= 1;
                // 缓冲区与 alloc_buffer 布局一致，直接交还所有权
                Some(Vec::from_raw_parts(
                    old_head.data,
                    old_head.data_size,
                    old_head.data_size,
                ))
            }
        }

        fn pop_back(&mut self) -> Option<Vec<u8>> {
            if self.tail.is_null() {
                return None;
            }

            unsafe {
                let old_tail = Box::from_raw(self.tail);
                self.tail = old_tail.prev;

                if !self.tail.is_null() {
                    (*self.tail).next = ptr::null_mut();
                } else {
                    self.head = ptr::null_mut();
                }

                self.len -= 1;
                Some(Vec::from_raw_parts(
                    old_tail.data,
                    old_tail.data_size,
                    old_tail.data_size,
                ))
            }
        }

        fn size(&self) -> usize {
            self.len
        }
    }

    // 前向只读迭代器
    pub struct Iter<'a> {
        current: *mut Node,
        marker: PhantomData<&'a Node>,
    }

    impl<'a> Iterator for Iter<'a> {
        type Item = &'a [u8];

        fn next(&mut self) -> Option<Self::Item> {
            if self.current.is_null() {
                None
            } else {
                unsafe {
                    let item =
                        slice::from_raw_parts((*self.current).data, (*self.current).data_size);
                    self.current = (*self.current).next;
                    Some(item)
                }
            }
        }
    }

    // 格式化输出：负载按十六进制显示
    impl fmt::Debug for ErasedList {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_list().entries(self.iter().map(hex::encode)).finish()
        }
    }

    // 清理资源
    impl Drop for ErasedList {
        fn drop(&mut self) {
            while self.pop_front().is_some() {}
        }
    }

    // 默认实现
    impl Default for ErasedList {
        fn default() -> Self {
            Self::new()
        }
    }

}
