use stoneydsp_core::export::{require_single_export_mode, ExportMode};
use stoneydsp_core::types::{int32, uint32};

const MODE: ExportMode = require_single_export_mode(false, false, true);

stoneydsp_core::public_function! {
    pub fn plugin_frames(blocks: uint32, block_size: uint32) -> uint32 {
        blocks.wrapping_mul(block_size)
    }

    fn plugin_offset(frames: int32) -> int32 {
        frames - 1
    }
}

fn main() {
    assert_eq!(MODE, ExportMode::Local);
    assert_eq!(ExportMode::CURRENT, ExportMode::Local);
    assert_eq!(plugin_frames(4, 256), 1024);
    assert_eq!(plugin_offset(1024), 1023);
}
