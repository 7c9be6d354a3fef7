//! Store item model and the codec between items and catalog records.

mod codec;
pub mod keys;
mod value;

pub use codec::{
    format_price, format_timestamp, item_id, item_to_product, item_to_user, item_version,
    product_to_item, set_item_version, user_to_item,
};
pub use value::{AttributeValue, Item};
