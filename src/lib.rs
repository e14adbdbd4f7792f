pub mod status;
pub use status::status as other_status;
pub mod list;
pub use list::list as other_list;
pub mod capi;
pub use capi::capi as other_capi;
