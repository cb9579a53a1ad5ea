pub mod storage;
pub mod types;

pub use storage::{get_store_path, load_book, save_book};
pub use types::{Vendor, VendorBook};
