use stoneydsp_core::types::{FixedWidth, Signedness, TypeKind};

stoneydsp_core::semantic_types! {
    const PLUGIN_TYPES;
    /// Channel index.
    channel = u8, bits: 8, signed: false, Fixed, "uint8_t";
    /// Running frame counter.
    frame_count = u64, bits: 64, signed: false, Fixed, "uint64_t";
    gain_db = f32, bits: 32, signed: true, Float, "float";
}

fn main() {
    assert_eq!(PLUGIN_TYPES.len(), 3);
    assert_eq!(PLUGIN_TYPES[0].name, "channel");
    assert_eq!(PLUGIN_TYPES[1].size(), 8);
    assert_eq!(PLUGIN_TYPES[1].signedness, Signedness::Unsigned);
    assert_eq!(PLUGIN_TYPES[2].kind, TypeKind::Float);
    assert_eq!(PLUGIN_TYPES[2].c_name, "float");

    let frames: frame_count = 48_000;
    let gain: gain_db = -6.0;
    assert_eq!(<channel as FixedWidth>::WIDTH_BITS, 8);
    assert!(<gain_db as FixedWidth>::SIGNED);
    assert_eq!(frames.to_le_bytes().len(), 8);
    assert!(gain < 0.0);
}
