//! Read/write operations for the `centers` table.

mod key;
mod read;
mod types;
mod write;

pub use key::make_center_key;
pub use read::{list_centers_missing_coordinates, list_open_centers, list_open_centers_in_bbox};
pub use types::{CenterRow, NewCenter};
pub use write::{set_center_coordinates, upsert_center};
