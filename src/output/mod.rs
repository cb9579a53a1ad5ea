mod formatter;

pub use formatter::{
    format_board, format_percent, format_raw, format_tsv, format_vendor_detail, rank_vendors,
    should_use_colors, RankedVendor,
};
